//! Common error types for urlck

use thiserror::Error;

/// Common result type for urlck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across urlck checkers
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog data could not be fetched
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Requested catalog entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog data violates an invariant the checkers rely on
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Invalid user input or command-line parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
