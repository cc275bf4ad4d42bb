use std::path::PathBuf;

use thiserror::Error;

/// Validation errors for domain values supplied by users or configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("symbol list must contain at least one symbol")]
    EmptySymbolList,
    #[error("tab name cannot be empty")]
    EmptyTabName,
}

/// Errors raised while assembling a [`crate::TrackerConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable '{name}' is not set")]
    MissingEnv { name: &'static str },

    #[error("environment variable '{name}' has invalid value '{value}': {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Service-account authentication failures. All of them abort the run.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to read credential file '{}': {source}", path.display())]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential file '{}' is not a valid service account key: {reason}", path.display())]
    InvalidCredentials { path: PathBuf, reason: String },

    #[error("failed to sign token assertion: {0}")]
    Signing(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),
}

/// Spreadsheet read/write failures. These are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("sheets transport error: {0}")]
    Transport(String),

    #[error("sheets api returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode sheets response: {0}")]
    Decode(String),

    #[error("client is read-only; refusing to write range '{range}'")]
    ReadOnly { range: String },
}

/// Local CSV backup failures.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("failed to write backup '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to flush backup '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error type for tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Backup(#[from] BackupError),
}
