//! Configuration for Pigmento.
//!
//! Configuration precedence (highest first):
//! 1. CLI arguments (applied by the binary)
//! 2. Environment variables (`PIGMENTO_*`)
//! 3. Local config file (`./.pigmentorc`)
//! 4. Global config file (`~/.pigmento/config.toml`)
//! 5. Defaults

mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use error::{ConfigError, ConfigResult};

use crate::cell::{CellOptions, LoadFailurePolicy};
use crate::storage::BackendKind;

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "PIGMENTO_API_URL";
/// Environment variable overriding the storage directory.
pub const ENV_DATA_DIR: &str = "PIGMENTO_DATA_DIR";
/// Environment variable overriding the storage backend.
pub const ENV_BACKEND: &str = "PIGMENTO_BACKEND";
/// Environment variable enabling developer shortcuts.
pub const ENV_DEV_MODE: &str = "PIGMENTO_DEV_MODE";

fn pigmento_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".pigmento")
}

fn default_data_dir() -> PathBuf {
    pigmento_home().join("store")
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Durable storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend to open.
    #[serde(default)]
    pub backend: BackendKind,
    /// Directory for the secure file backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Give up on the initial read after this many milliseconds (unset = wait forever).
    #[serde(default)]
    pub load_timeout_ms: Option<u64>,
    /// What a cell does when its initial read fails or times out.
    #[serde(default)]
    pub on_load_failure: LoadFailurePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
            load_timeout_ms: None,
            on_load_failure: LoadFailurePolicy::default(),
        }
    }
}

impl StorageConfig {
    /// Options handed to every persistent cell.
    pub fn cell_options(&self) -> CellOptions {
        CellOptions {
            load_timeout: self.load_timeout_ms.map(Duration::from_millis),
            on_load_failure: self.on_load_failure,
        }
    }
}

/// Session context configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Keep reporting "loading" until the onboarding flag is loaded as well.
    ///
    /// Off by default: only the session token gates loading, so a slow
    /// onboarding read can briefly show the onboarding route.
    #[serde(default)]
    pub gate_on_onboarding_load: bool,
}

/// Pigmento API client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Enables developer shortcuts such as the placeholder sign-in.
    #[serde(default)]
    pub dev_mode: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            dev_mode: false,
        }
    }
}

/// Root configuration for Pigmento.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Log level.
    #[serde(default)]
    pub log_level: Option<String>,
}

/// One configuration file. Every field is optional so that a layer only
/// overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigLayer {
    #[serde(default)]
    pub storage: StorageLayer,
    #[serde(default)]
    pub session: SessionLayer,
    #[serde(default)]
    pub api: ApiLayer,
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Storage section of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageLayer {
    pub backend: Option<BackendKind>,
    pub data_dir: Option<PathBuf>,
    pub load_timeout_ms: Option<u64>,
    pub on_load_failure: Option<LoadFailurePolicy>,
}

/// Session section of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionLayer {
    pub gate_on_onboarding_load: Option<bool>,
}

/// API section of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiLayer {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub dev_mode: Option<bool>,
}

impl ConfigLayer {
    /// Load a layer from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Parse a layer from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl Config {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        pigmento_home().join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".pigmentorc")
    }

    /// Discover configuration files and environment overrides.
    ///
    /// A missing file is skipped silently; a file that exists but cannot be
    /// parsed is an error, so a typo never falls back to defaults unnoticed.
    pub fn discover_and_load() -> ConfigResult<Self> {
        let mut config = Self::default();

        for path in [Self::default_global_path(), Self::default_local_path()] {
            match ConfigLayer::load_from_file(&path) {
                Ok(layer) => config.merge(&layer),
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        config.apply_env_overrides_from(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Merge a layer into this configuration.
    ///
    /// Values from `layer` override values in `self` if they are Some.
    pub fn merge(&mut self, layer: &ConfigLayer) {
        if let Some(backend) = layer.storage.backend {
            self.storage.backend = backend;
        }
        if let Some(ref data_dir) = layer.storage.data_dir {
            self.storage.data_dir = data_dir.clone();
        }
        if let Some(timeout) = layer.storage.load_timeout_ms {
            self.storage.load_timeout_ms = Some(timeout);
        }
        if let Some(policy) = layer.storage.on_load_failure {
            self.storage.on_load_failure = policy;
        }
        if let Some(gate) = layer.session.gate_on_onboarding_load {
            self.session.gate_on_onboarding_load = gate;
        }
        if let Some(ref base_url) = layer.api.base_url {
            self.api.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = layer.api.request_timeout_secs {
            self.api.request_timeout_secs = timeout;
        }
        if let Some(dev_mode) = layer.api.dev_mode {
            self.api.dev_mode = dev_mode;
        }
        if let Some(ref log_level) = layer.log_level {
            self.log_level = Some(log_level.clone());
        }
    }

    /// Apply `PIGMENTO_*` overrides using `lookup` to read variables.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.storage.backend = backend
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("{ENV_BACKEND}={backend}")))?;
        }
        if let Some(dev_mode) = lookup(ENV_DEV_MODE) {
            self.api.dev_mode = matches!(dev_mode.trim(), "1" | "true" | "yes" | "on");
        }
        Ok(())
    }
}
