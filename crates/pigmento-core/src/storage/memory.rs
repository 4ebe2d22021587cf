//! In-process key-string store.
//!
//! Mirrors browser `localStorage`: a synchronous string map whose operations
//! are exposed through the async [`KeyValueStore`] contract. Values do not
//! survive the process, which makes this backend the default for web-hosted
//! builds that persist elsewhere and for tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::error::{StorageError, StorageResult};
use super::{KeyValueStore, StorageKey};

/// Key-string store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw (already serialized) entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: RwLock::new(entries) }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StorageError {
        StorageError::Unavailable("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key.as_str()).cloned())
    }

    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key.as_str().to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.remove(key.as_str());
        Ok(())
    }
}
