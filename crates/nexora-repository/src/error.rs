//! Error types for the repository layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Profile source missing or malformed; fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No profile with this user id
    #[error("User not found: {user_id}")]
    NotFound { user_id: String },

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error in the interaction log
    #[error("Interaction log error: {0}")]
    Log(String),
}

impl From<csv::Error> for RepositoryError {
    fn from(err: csv::Error) -> Self {
        RepositoryError::Log(err.to_string())
    }
}
