use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for rendered export content.
pub enum OutputSink<'a> {
    /// Caller-owned stream; written to but never closed here.
    Stream(&'a mut dyn Write),
    /// File created (or truncated) relative to the working directory.
    File(PathBuf),
}

impl std::fmt::Debug for OutputSink<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("Stream"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

pub(crate) fn write_output(
    content: &str,
    cwd: &Path,
    sink: &mut OutputSink<'_>,
) -> std::io::Result<()> {
    match sink {
        OutputSink::Stream(stream) => {
            stream.write_all(content.as_bytes())?;
            stream.flush()
        }
        OutputSink::File(path) => {
            let target = cwd.join(path);
            let mut writer = BufWriter::new(File::create(&target)?);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
            tracing::info!(path = %target.display(), bytes = content.len(), "wrote export");
            Ok(())
        }
    }
}
