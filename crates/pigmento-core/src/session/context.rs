//! Session context: token and onboarding cells behind one handle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use super::Gate;
use crate::cell::{CellOptions, CellState, PersistentCell};
use crate::config::{Config, SessionConfig};
use crate::storage::{KeyValueStore, StorageKey};

/// Point-in-time view of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Authentication token; `None` when signed out.
    pub session: Option<String>,
    /// Whether onboarding was completed.
    pub is_onboard: bool,
    /// True until the stored session has been loaded.
    pub is_loading: bool,
}

impl SessionSnapshot {
    fn compose(session: &CellState<String>, onboard: &CellState<bool>, gate_on_onboarding_load: bool) -> Self {
        Self {
            session: session.value.clone(),
            is_onboard: onboard.value.unwrap_or(false),
            is_loading: session.is_loading || (gate_on_onboarding_load && onboard.is_loading),
        }
    }

    /// Gate derived from this snapshot.
    pub fn gate(&self) -> Gate {
        Gate::from_snapshot(self)
    }
}

/// Process-wide session state.
///
/// Cheap to clone; every clone observes and mutates the same cells. Build
/// exactly one per process and pass it to consumers: each storage key must be
/// owned by a single cell.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session: PersistentCell<String>,
    is_onboard: PersistentCell<bool>,
    config: SessionConfig,
}

impl SessionContext {
    /// Create the context and start loading both cells from `store`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: Arc<dyn KeyValueStore>, config: SessionConfig, options: CellOptions) -> Self {
        let session = PersistentCell::spawn(StorageKey::SESSION, None, Arc::clone(&store), options);
        let is_onboard = PersistentCell::spawn(StorageKey::IS_ONBOARD, Some(false), store, options);
        Self { session, is_onboard, config }
    }

    /// Create the context using the session and storage sections of `config`.
    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self::new(store, config.session.clone(), config.storage.cell_options())
    }

    /// Store `token` as the current session. No validation, no network.
    pub fn sign_in(&self, token: impl Into<String>) {
        self.session.set(Some(token.into()));
        info!("Signed in");
    }

    /// Forget the current session.
    pub fn sign_out(&self) {
        self.session.set(None);
        info!("Signed out");
    }

    /// Mark onboarding as done. There is no way back.
    pub fn complete_onboarding(&self) {
        self.is_onboard.set(Some(true));
        info!("Onboarding completed");
    }

    /// Current token.
    pub fn session(&self) -> Option<String> {
        self.session.value()
    }

    /// Whether onboarding was completed; `false` while its cell loads.
    pub fn is_onboard(&self) -> bool {
        self.is_onboard.value().unwrap_or(false)
    }

    /// Whether the stored session is still being loaded.
    ///
    /// Only the token cell counts unless `gate_on_onboarding_load` is set.
    pub fn is_loading(&self) -> bool {
        self.session.is_loading() || (self.config.gate_on_onboarding_load && self.is_onboard.is_loading())
    }

    /// Consistent view of all three fields.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::compose(
            &self.session.state(),
            &self.is_onboard.state(),
            self.config.gate_on_onboarding_load,
        )
    }

    /// Current gate.
    pub fn gate(&self) -> Gate {
        self.snapshot().gate()
    }

    /// Wait until [`is_loading`](Self::is_loading) turns false.
    pub async fn ready(&self) -> SessionSnapshot {
        self.session.ready().await;
        if self.config.gate_on_onboarding_load {
            self.is_onboard.ready().await;
        }
        self.snapshot()
    }

    /// Wait until both cells finished their initial read, whatever the
    /// configured gating.
    pub async fn settled(&self) -> SessionSnapshot {
        self.session.ready().await;
        self.is_onboard.ready().await;
        self.snapshot()
    }

    /// Wait until all queued durable writes have been attempted.
    pub async fn flush(&self) {
        self.session.flush().await;
        self.is_onboard.flush().await;
    }

    /// Watch for changes of either cell.
    pub fn watch(&self) -> SessionWatcher {
        SessionWatcher {
            session: self.session.subscribe(),
            is_onboard: self.is_onboard.subscribe(),
            gate_on_onboarding_load: self.config.gate_on_onboarding_load,
        }
    }
}

/// Change notifications for a [`SessionContext`].
#[derive(Debug)]
pub struct SessionWatcher {
    session: watch::Receiver<CellState<String>>,
    is_onboard: watch::Receiver<CellState<bool>>,
    gate_on_onboarding_load: bool,
}

impl SessionWatcher {
    /// Current snapshot; marks it as seen.
    pub fn current(&mut self) -> SessionSnapshot {
        let session = self.session.borrow_and_update().clone();
        let is_onboard = self.is_onboard.borrow_and_update().clone();
        SessionSnapshot::compose(&session, &is_onboard, self.gate_on_onboarding_load)
    }

    /// Wait for the next change and return the new snapshot.
    ///
    /// Returns `None` once the context has been dropped.
    pub async fn changed(&mut self) -> Option<SessionSnapshot> {
        let result = tokio::select! {
            r = self.session.changed() => r,
            r = self.is_onboard.changed() => r,
        };
        result.ok()?;
        Some(self.current())
    }
}
