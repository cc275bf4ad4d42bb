use quotesheet_core::TrackerError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] quotesheet_core::ValidationError),

    #[error(transparent)]
    Config(#[from] quotesheet_core::ConfigError),

    #[error(transparent)]
    Auth(#[from] quotesheet_core::AuthError),

    #[error(transparent)]
    Sheet(#[from] quotesheet_core::SheetError),

    #[error(transparent)]
    Backup(#[from] quotesheet_core::BackupError),

    #[error("strict mode failed: {failure_count} failure(s)")]
    StrictModeViolation { failure_count: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<TrackerError> for CliError {
    fn from(error: TrackerError) -> Self {
        match error {
            TrackerError::Validation(e) => Self::Validation(e),
            TrackerError::Config(e) => Self::Config(e),
            TrackerError::Auth(e) => Self::Auth(e),
            TrackerError::Sheet(e) => Self::Sheet(e),
            TrackerError::Backup(e) => Self::Backup(e),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Config(_) => 2,
            Self::Auth(_) => 3,
            Self::Sheet(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) => 6,
            Self::Backup(_) | Self::Io(_) => 10,
        }
    }
}
