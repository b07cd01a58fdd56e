//! Error types for the search client.

use thiserror::Error;

/// Errors that can occur when talking to the search service.
#[derive(Error, Debug)]
pub enum SearchClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid base URL
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse service response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Service is offline or unreachable
    #[error("Service unreachable: {0}")]
    ServiceUnreachable(String),

    /// Rate limited by service
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Result type for search client operations.
pub type Result<T> = std::result::Result<T, SearchClientError>;

impl From<SearchClientError> for tandem_core::TandemError {
    fn from(err: SearchClientError) -> Self {
        tandem_core::TandemError::search(err.to_string())
    }
}
