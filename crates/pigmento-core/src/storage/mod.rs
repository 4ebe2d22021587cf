//! Durable key-value storage.
//!
//! The rest of the crate only talks to [`KeyValueStore`]. Which backend sits
//! behind it is decided once, by the embedding application, through
//! [`open_backend`]:
//!
//! - [`MemoryStore`] — browser-style key-string store (synchronous map
//!   wrapped as async)
//! - [`SecureFileStore`] — owner-only files for native builds
//!
//! Backends store raw strings. Serialization is the caller's concern (see
//! [`crate::cell`]).

mod error;
mod key;
mod memory;
mod secure;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use error::{StorageError, StorageResult};
pub use key::StorageKey;
pub use memory::MemoryStore;
pub use secure::SecureFileStore;

use crate::config::StorageConfig;

/// Asynchronous key-string storage capability.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short backend name, used in log fields.
    fn name(&self) -> &'static str;

    /// Read the raw value stored under `key`, `None` if absent.
    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &StorageKey) -> StorageResult<()>;
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process key-string store.
    Memory,
    /// Owner-only files under the configured data directory.
    #[default]
    Secure,
}

impl BackendKind {
    /// Get the string representation of the backend kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Secure => "secure",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "web" => Ok(Self::Memory),
            "secure" | "native" | "file" => Ok(Self::Secure),
            other => Err(StorageError::Unavailable(format!("unknown storage backend: {other}"))),
        }
    }
}

/// Open the backend described by `config`.
pub async fn open_backend(config: &StorageConfig) -> StorageResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        BackendKind::Memory => Arc::new(MemoryStore::new()),
        BackendKind::Secure => Arc::new(SecureFileStore::open(config.data_dir.clone()).await?),
    };
    info!(backend = store.name(), "Opened storage backend");
    Ok(store)
}
