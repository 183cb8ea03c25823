//! Common error types for Xiamiu

use thiserror::Error;

/// Common result type for Xiamiu operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Xiamiu services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Key or unique name already taken
    #[error("{0}")]
    Duplicate(String),

    /// Credential or token rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Authenticated, but acting on someone else's resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
