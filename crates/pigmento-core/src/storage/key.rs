//! Storage keys.

use std::borrow::Cow;
use std::fmt;

use super::error::{StorageError, StorageResult};

/// Identifier under which a single serialized value lives in durable storage.
///
/// A key must not be reused for two different semantic values. Keys are
/// restricted to `[A-Za-z0-9_.-]` so every backend (including the file-backed
/// one, which maps keys to file names) can store them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(Cow<'static, str>);

impl StorageKey {
    /// Authentication token of the signed-in user.
    pub const SESSION: Self = Self(Cow::Borrowed("session"));

    /// Whether the onboarding slides were completed.
    pub const IS_ONBOARD: Self = Self(Cow::Borrowed("isOnboard"));

    /// Build a key from an arbitrary name, validating its characters.
    pub fn new(name: impl Into<String>) -> StorageResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(StorageError::InvalidKey("key must not be empty".to_string()));
        }
        if name.starts_with('.') {
            return Err(StorageError::InvalidKey(format!("key must not start with '.': {name}")));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(StorageError::InvalidKey(format!("unsupported character {bad:?} in {name}")));
        }
        Ok(Self(Cow::Owned(name)))
    }

    /// The key as stored by the backend.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
