use std::fmt;
use std::path::Path;
use std::str::FromStr;

use reqx_domain::Project;

use crate::error::ExportError;
use crate::options::ExportOptions;
use crate::requirements::render_requirements_txt;
use crate::sink::{write_output, OutputSink};

/// Registered export formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    RequirementsTxt,
}

impl ExportFormat {
    pub const ALL: &'static [ExportFormat] = &[ExportFormat::RequirementsTxt];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequirementsTxt => "requirements.txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.as_str() == value)
            .ok_or_else(|| ExportError::InvalidFormat {
                format: value.to_string(),
            })
    }
}

/// Writes a locked project out in one of the [`ExportFormat`]s.
pub struct Exporter<'a> {
    project: &'a Project,
}

impl<'a> Exporter<'a> {
    #[must_use]
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// Validates `format` by name, then exports. Nothing is written for an unknown format.
    pub fn export(
        &self,
        format: &str,
        cwd: &Path,
        sink: &mut OutputSink<'_>,
        options: &ExportOptions,
    ) -> Result<(), ExportError> {
        let format = ExportFormat::from_str(format)?;
        self.export_format(format, cwd, sink, options)
    }

    pub fn export_format(
        &self,
        format: ExportFormat,
        cwd: &Path,
        sink: &mut OutputSink<'_>,
        options: &ExportOptions,
    ) -> Result<(), ExportError> {
        tracing::debug!(%format, dev = options.dev, extras = ?options.extras, "exporting lock");
        let content = match format {
            ExportFormat::RequirementsTxt => render_requirements_txt(self.project, options)?,
        };
        write_output(&content, cwd, sink)?;
        Ok(())
    }
}
