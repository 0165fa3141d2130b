//! Common error types for MiNote

use thiserror::Error;

/// Common result type for MiNote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across MiNote crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input (unsupported file type, malformed argument)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record id already present in the store
    #[error("Conflict: {0}")]
    Conflict(String),
}
