//! Error types for Pigmento Core.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Top-level error type for Pigmento operations.
#[derive(Error, Debug)]
pub enum PigmentoError {
    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Pigmento operations.
pub type Result<T> = std::result::Result<T, PigmentoError>;
