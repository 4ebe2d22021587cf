//! Command implementations for the Pigmento CLI.

pub mod auth;
pub mod color;
pub mod onboard;
pub mod push;
pub mod status;
pub mod upload;

use std::time::Duration;

use anyhow::{Context, bail};
use pigmento_core::{Config, Gate, PigmentoClient, SessionContext, storage};
use tracing::debug;

/// How long a command waits for the stored session before giving up.
const READY_TIMEOUT: Duration = Duration::from_secs(10);

/// State shared by every command.
pub struct AppContext {
    pub config: Config,
    pub session: SessionContext,
}

impl AppContext {
    /// Open the configured backend and wait until the session is loaded.
    pub async fn open(config: Config) -> anyhow::Result<Self> {
        let store = storage::open_backend(&config.storage)
            .await
            .with_context(|| format!("Failed to open {} storage", config.storage.backend))?;
        let session = SessionContext::from_config(store, &config);

        let snapshot = tokio::time::timeout(READY_TIMEOUT, session.settled())
            .await
            .with_context(|| format!("Timed out loading session from {}", config.storage.data_dir.display()))?;
        debug!(gate = %snapshot.gate(), "Session ready");

        Ok(Self { config, session })
    }

    /// API client carrying the current session token.
    pub fn client(&self) -> anyhow::Result<PigmentoClient> {
        Ok(PigmentoClient::new(&self.config.api)?.with_token(self.session.session()))
    }

    /// Refuse to continue unless the session is authenticated.
    pub fn require_authenticated(&self) -> anyhow::Result<()> {
        match self.session.gate() {
            Gate::Authenticated => Ok(()),
            Gate::NeedsOnboarding => bail!("Onboarding not completed. Run `pigmento onboard` first."),
            gate => bail!("Not signed in ({}). Run `pigmento sign-in` first.", gate),
        }
    }
}
