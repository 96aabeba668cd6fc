//! Error taxonomy shared by every plog crate

use chrono::NaiveDateTime;

/// Failure of an underlying file or database operation
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Lock failed: {0}")]
    LockFailed(String),

    #[error("Invalid backend configuration: {0}")]
    Config(String),
}

/// Top-level plog error
#[derive(Debug, thiserror::Error)]
pub enum PlogError {
    #[error("Start date {start} must be before end date {end}")]
    Validation {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unrecognized date format: {input:?}")]
    Parse { input: String },

    #[error("Stored record is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown level in stored record: {0:?}")]
    UnknownLevel(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, PlogError>;
