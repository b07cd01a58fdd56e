/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Stored data could not be interpreted
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for tandem_core::TandemError {
    fn from(err: StorageError) -> Self {
        tandem_core::TandemError::storage(err.to_string())
    }
}
