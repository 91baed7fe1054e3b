//! Error types for onehack.

use thiserror::Error;

/// Errors that can occur in onehack operations.
#[derive(Error, Debug)]
pub enum OneHackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch hackathons: {0}")]
    Fetch(String),

    #[error("Failed to update bookmark: {0}")]
    BookmarkWrite(String),

    #[error("Could not obtain an access token: {0}")]
    Token(String),

    #[error("A bookmark change for '{0}' is already in progress")]
    OperationPending(String),

    #[error("Hackathon '{0}' has no id and cannot be bookmarked remotely")]
    MissingId(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for onehack operations.
pub type OneHackResult<T> = Result<T, OneHackError>;
