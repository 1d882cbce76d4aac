//! Error types for the compatibility checker

use thiserror::Error;

/// Result type for compatibility operations
pub type Result<T> = std::result::Result<T, CompatError>;

/// Compatibility checker errors
///
/// A rejected schema change is not an error; it is reported through
/// [`Evaluation::accepted`](crate::policy::Evaluation::accepted).
#[derive(Error, Debug)]
pub enum CompatError {
    #[error("Unknown strictness mode: {0} (expected development or production)")]
    UnknownMode(String),

    #[error("Unknown report format: {0} (expected text or json)")]
    UnknownFormat(String),

    #[error("Unknown verdict: {0}")]
    UnknownVerdict(String),

    #[error("No {0} schema given and none configured")]
    MissingInput(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
