//! Persistent key-value state cell.
//!
//! A [`PersistentCell`] holds one named value that must survive restarts. It
//! has a synchronous in-memory surface and an asynchronous durable path:
//!
//! - on creation the state is `(loading, initial)` and a background task
//!   reads the key from the store
//! - [`PersistentCell::set`] updates the in-memory state immediately and
//!   queues the durable write; the caller never waits for it and never sees
//!   its errors, which are only logged
//!
//! Writes of one cell are applied by a single worker task in the order they
//! were issued, so the last value set is the one that ends up stored.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, warn};

use crate::storage::{KeyValueStore, StorageKey};

/// Observable state of a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellState<T> {
    /// True until the initial read resolves or a value is set.
    pub is_loading: bool,
    /// Current value; `None` means empty.
    pub value: Option<T>,
}

impl<T> CellState<T> {
    fn loading(value: Option<T>) -> Self {
        Self { is_loading: true, value }
    }

    fn ready(value: Option<T>) -> Self {
        Self { is_loading: false, value }
    }
}

/// What a cell does when its initial read fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadFailurePolicy {
    /// Log and keep waiting. A slow read still resolves the cell; a failed
    /// one leaves it loading until a value is set.
    #[default]
    KeepLoading,
    /// Log and resolve to the initial value.
    UseInitial,
}

/// Tuning for a cell's initial load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellOptions {
    /// Apply the failure policy once the initial read takes this long.
    pub load_timeout: Option<Duration>,
    /// Behavior on read failure or timeout.
    pub on_load_failure: LoadFailurePolicy,
}

enum WriteOp {
    /// Store the serialized value, or delete the key for `None`.
    Put(Option<String>),
    /// Acknowledge once every earlier op was attempted.
    Flush(oneshot::Sender<()>),
}

/// Handle to a persistent cell. Clones share the same state.
pub struct PersistentCell<T> {
    key: StorageKey,
    state: Arc<watch::Sender<CellState<T>>>,
    writes: mpsc::UnboundedSender<WriteOp>,
}

impl<T> Clone for PersistentCell<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            state: Arc::clone(&self.state),
            writes: self.writes.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentCell")
            .field("key", &self.key)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<T> PersistentCell<T>
where
    T: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a cell for `key` and start loading it.
    ///
    /// Must be called from within a tokio runtime: the initial read and the
    /// write worker run as spawned tasks.
    pub fn spawn(
        key: StorageKey,
        initial: Option<T>,
        store: Arc<dyn KeyValueStore>,
        options: CellOptions,
    ) -> Self {
        let (state, _) = watch::channel(CellState::loading(initial.clone()));
        let state = Arc::new(state);
        let (writes, queue) = mpsc::unbounded_channel();

        tokio::spawn(load_initial(
            key.clone(),
            Arc::clone(&store),
            Arc::clone(&state),
            initial,
            options,
        ));
        tokio::spawn(run_writer(key.clone(), store, queue));

        Self { key, state, writes }
    }

    /// Storage key owned by this cell.
    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CellState<T> {
        self.state.borrow().clone()
    }

    /// Current value.
    pub fn value(&self) -> Option<T> {
        self.state.borrow().value.clone()
    }

    /// Whether the initial read is still pending.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<CellState<T>> {
        self.state.subscribe()
    }

    /// Wait until the cell is no longer loading and return its state.
    pub async fn ready(&self) -> CellState<T> {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Set the value.
    ///
    /// The in-memory state becomes `(false, value)` before this returns. The
    /// durable write (delete for `None`) is queued and runs in the
    /// background; failures are logged and dropped.
    pub fn set(&self, value: Option<T>) {
        let raw = match value.as_ref().map(serde_json::to_string).transpose() {
            Ok(raw) => Some(raw),
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to serialize value; not persisted");
                None
            }
        };

        let next = CellState::ready(value);
        let changed = self.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
        debug!(key = %self.key, changed, "Cell value set");

        if let Some(raw) = raw {
            if self.writes.send(WriteOp::Put(raw)).is_err() {
                warn!(key = %self.key, "Write worker stopped; value not persisted");
            }
        }
    }

    /// Wait until every write issued before this call has been attempted.
    ///
    /// In-memory state never depends on this; it exists for short-lived
    /// processes that must not exit with writes still queued.
    pub async fn flush(&self) {
        let (done, acked) = oneshot::channel();
        if self.writes.send(WriteOp::Flush(done)).is_ok() {
            let _ = acked.await;
        }
    }
}

async fn load_initial<T>(
    key: StorageKey,
    store: Arc<dyn KeyValueStore>,
    state: Arc<watch::Sender<CellState<T>>>,
    initial: Option<T>,
    options: CellOptions,
) where
    T: DeserializeOwned + Send + Sync,
{
    let mut read = store.get(&key);
    let outcome = match options.load_timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut read).await {
            Ok(result) => result,
            Err(_) => {
                warn!(key = %key, backend = store.name(), timeout_ms = limit.as_millis() as u64, "Timed out loading state from storage");
                if options.on_load_failure == LoadFailurePolicy::UseInitial {
                    resolve(&key, &state, initial);
                    return;
                }
                read.await
            }
        },
        None => read.await,
    };

    match outcome {
        Ok(Some(raw)) => match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => resolve(&key, &state, value),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored value is not valid JSON; treating as absent");
                resolve(&key, &state, initial);
            }
        },
        Ok(None) => resolve(&key, &state, initial),
        Err(e) => {
            error!(key = %key, backend = store.name(), error = %e, "Failed to load state from storage");
            if options.on_load_failure == LoadFailurePolicy::UseInitial {
                resolve(&key, &state, initial);
            }
        }
    }
}

/// Apply a loaded value unless a setter already resolved the cell.
fn resolve<T>(key: &StorageKey, state: &watch::Sender<CellState<T>>, value: Option<T>) {
    let applied = state.send_if_modified(|current| {
        if current.is_loading {
            *current = CellState::ready(value);
            true
        } else {
            false
        }
    });
    if applied {
        debug!(key = %key, "Cell loaded");
    } else {
        debug!(key = %key, "Cell already set; discarding loaded value");
    }
}

async fn run_writer(
    key: StorageKey,
    store: Arc<dyn KeyValueStore>,
    mut queue: mpsc::UnboundedReceiver<WriteOp>,
) {
    while let Some(op) = queue.recv().await {
        match op {
            WriteOp::Put(Some(raw)) => {
                if let Err(e) = store.set(&key, raw).await {
                    error!(key = %key, backend = store.name(), error = %e, "Failed to persist state");
                }
            }
            WriteOp::Put(None) => {
                if let Err(e) = store.delete(&key).await {
                    error!(key = %key, backend = store.name(), error = %e, "Failed to remove state");
                }
            }
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(key = %key, "Write worker stopped");
}
