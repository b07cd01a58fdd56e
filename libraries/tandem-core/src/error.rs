/// Core error types for Tandem
use thiserror::Error;

/// Result type alias using `TandemError`
pub type Result<T> = std::result::Result<T, TandemError>;

/// Core error type for Tandem
#[derive(Error, Debug)]
pub enum TandemError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote search service errors
    #[error("Search error: {0}")]
    Search(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TandemError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a search error
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
