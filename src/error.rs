//! Error types for filestash.

use thiserror::Error;

/// Common error type for filestash.
#[derive(Error, Debug)]
pub enum StashError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant with their message.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error from the blob store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input (missing fields, oversized uploads).
    #[error("validation error: {0}")]
    Validation(String),

    /// Identifier that does not parse as a record id.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for StashError {
    fn from(e: sqlx::Error) -> Self {
        StashError::Database(e.to_string())
    }
}

/// Result type alias for filestash operations.
pub type Result<T> = std::result::Result<T, StashError>;
