//! Common error types for the atelier service

use thiserror::Error;

/// Common result type for atelier operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the atelier crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Outbound spreadsheet append error
    #[error("Sink error: {0}")]
    Sink(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
