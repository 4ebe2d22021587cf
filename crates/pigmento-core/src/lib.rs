//! Pigmento Core - session persistence and API client for the Pigmento app.
//!
//! This crate provides:
//! - key-value storage backends (in-memory and owner-only files)
//! - [`cell::PersistentCell`], a value mirrored into a store with a loading flag
//! - the session context and the gate that routes on it
//! - a client for the Pigmento REST API
//!
//! # Example
//!
//! ```rust,no_run
//! use pigmento_core::{Config, SessionContext, storage};
//!
//! #[tokio::main]
//! async fn main() -> pigmento_core::Result<()> {
//!     let config = Config::discover_and_load()?;
//!     let store = storage::open_backend(&config.storage).await?;
//!     let session = SessionContext::from_config(store, &config);
//!     println!("{}", session.ready().await.gate());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cell;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod storage;

pub use api::{ApiError, PigmentoClient, SignInForm, SignUpForm};
pub use cell::{CellOptions, CellState, LoadFailurePolicy, PersistentCell};
pub use config::Config;
pub use error::{PigmentoError, Result};
pub use session::{Gate, SessionContext, SessionSnapshot, SessionWatcher};
pub use storage::{BackendKind, KeyValueStore, MemoryStore, SecureFileStore, StorageError, StorageKey};
