//! Error types for foyer.

use thiserror::Error;

/// Common error type for foyer.
#[derive(Error, Debug)]
pub enum FoyerError {
    /// Database error.
    ///
    /// Wraps errors from the sqlx backend as strings so callers don't need
    /// to depend on sqlx error types directly.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A username that is already taken.
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for FoyerError {
    fn from(e: sqlx::Error) -> Self {
        FoyerError::Database(e.to_string())
    }
}

/// Result type alias for foyer operations.
pub type Result<T> = std::result::Result<T, FoyerError>;
