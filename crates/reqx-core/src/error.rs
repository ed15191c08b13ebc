/// Failures surfaced by an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("invalid export format '{format}'")]
    InvalidFormat { format: String },
    #[error("dependency '{name}' has no matching package in the lock file")]
    MissingLockedPackage { name: String },
    #[error("package index '{url}' is not a configured source")]
    UnknownSourceIndex { url: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExportError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "RX100",
            Self::MissingLockedPackage { .. } => "RX200",
            Self::UnknownSourceIndex { .. } => "RX201",
            Self::Io(_) => "RX300",
        }
    }

    /// Invalid input from the caller, as opposed to corrupt lock data or I/O trouble.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. })
    }
}
