use thiserror::Error;

/// Errors raised by a [`RecordStore`][crate::store::RecordStore] backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage transaction failed: {0}")]
    Transaction(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("record serialization failed: {0}")]
    Serialization(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the mapping service to its callers.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("invalid date format (YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("short key already exists: {0}")]
    KeyConflict(String),
    #[error("no free short key found after {attempts} attempts")]
    KeyGenerationExhausted { attempts: u32 },
    #[error("short key not found: {0}")]
    NotFound(String),
    #[error("short key has expired: {0}")]
    Expired(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
