//! Error types for the storage layer.

use thiserror::Error;

/// Errors that can occur in a key-value storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend cannot be reached (locked keychain, disabled browser storage, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key is not acceptable for this backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
