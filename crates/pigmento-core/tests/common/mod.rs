//! Store doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pigmento_core::storage::{KeyValueStore, MemoryStore, StorageError, StorageKey, StorageResult};
use tokio::sync::Semaphore;

/// Memory store whose reads and writes take `delay`.
pub struct SlowStore {
    pub inner: MemoryStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(inner: MemoryStore, delay: Duration) -> Arc<Self> {
        Arc::new(Self { inner, delay })
    }
}

#[async_trait]
impl KeyValueStore for SlowStore {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(key).await
    }
}

/// Memory store whose reads block until [`GatedStore::release`] is called.
pub struct GatedStore {
    pub inner: MemoryStore,
    gate: Semaphore,
}

impl GatedStore {
    pub fn new(inner: MemoryStore) -> Arc<Self> {
        Arc::new(Self { inner, gate: Semaphore::new(0) })
    }

    /// Let every pending and future read through.
    pub fn release(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

#[async_trait]
impl KeyValueStore for GatedStore {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        let _permit = self.gate.acquire().await.map_err(|e| StorageError::Unavailable(e.to_string()))?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        self.inner.delete(key).await
    }
}

/// Memory store that blocks reads of one key until [`KeyGatedStore::release`].
pub struct KeyGatedStore {
    pub inner: MemoryStore,
    key: StorageKey,
    gate: Semaphore,
}

impl KeyGatedStore {
    pub fn new(inner: MemoryStore, key: StorageKey) -> Arc<Self> {
        Arc::new(Self { inner, key, gate: Semaphore::new(0) })
    }

    pub fn release(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

#[async_trait]
impl KeyValueStore for KeyGatedStore {
    fn name(&self) -> &'static str {
        "key-gated"
    }

    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        if *key == self.key {
            let _permit = self.gate.acquire().await.map_err(|e| StorageError::Unavailable(e.to_string()))?;
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        self.inner.delete(key).await
    }
}

/// Store that rejects every operation and counts the attempts.
#[derive(Default)]
pub struct FailingStore {
    pub attempts: AtomicUsize,
}

impl FailingStore {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail(&self) -> StorageError {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        StorageError::Unavailable("backend offline".to_string())
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &StorageKey) -> StorageResult<Option<String>> {
        Err(self.fail())
    }

    async fn set(&self, _key: &StorageKey, _value: String) -> StorageResult<()> {
        Err(self.fail())
    }

    async fn delete(&self, _key: &StorageKey) -> StorageResult<()> {
        Err(self.fail())
    }
}
