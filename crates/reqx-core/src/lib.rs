#![deny(clippy::all)]

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

mod config;
mod error;
mod exporter;
mod options;
mod requirements;
mod sink;

pub use crate::error::ExportError;
pub use crate::exporter::{ExportFormat, Exporter};
pub use crate::options::ExportOptions;
pub use crate::requirements::ALLOWED_HASH_ALGORITHMS;
pub use crate::sink::OutputSink;

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub project_dir: PathBuf,
    pub format: String,
    pub options: ExportOptions,
}

/// Loads the project at `request.project_dir` and exports it into `sink`.
///
/// # Errors
/// Returns an [`ExportError`] (inside the `anyhow` chain) for invalid formats,
/// inconsistent lock data and write failures; manifest or lock parsing errors
/// carry file context instead.
pub fn export_project(request: &ExportRequest, sink: &mut OutputSink<'_>) -> Result<()> {
    let format = ExportFormat::from_str(&request.format)?;
    let mut project = reqx_domain::read_project(&request.project_dir)?;
    if request.options.with_credentials {
        let snapshot = config::EnvSnapshot::capture();
        let credentials = config::source_credentials(&snapshot, &project.pool);
        project.pool.apply_credentials(&credentials);
    }
    Exporter::new(&project).export_format(format, &project.root_dir, sink, &request.options)?;
    Ok(())
}
