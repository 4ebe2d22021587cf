//! File-backed secure store for native builds.
//!
//! Each key is stored in its own file inside a private directory. The
//! directory is created with `0700` and every value file with `0600`, the
//! same permissions used for credential files, so tokens are only readable
//! by the owning user. Writes go through a temporary file and an atomic
//! rename so a crash never leaves a half-written value behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::error::StorageResult;
use super::{KeyValueStore, StorageKey};

/// Extension given to value files.
const VALUE_EXTENSION: &str = "json";

/// Owner-only key-value store on the local filesystem.
#[derive(Debug, Clone)]
pub struct SecureFileStore {
    dir: PathBuf,
}

impl SecureFileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub async fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let store = Self { dir: dir.into() };
        store.ensure_dir().await?;
        Ok(store)
    }

    /// Directory holding the value files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &StorageKey) -> PathBuf {
        self.dir.join(format!("{}.{}", key.as_str(), VALUE_EXTENSION))
    }

    async fn ensure_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.dir).await?;

        // Set directory permissions to 0700 (rwx------)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, std::fs::Permissions::from_mode(0o700)).await?;
        }

        Ok(())
    }

    /// Write content to a file atomically.
    async fn atomic_write(&self, path: &Path, content: &str) -> StorageResult<()> {
        let temp_path = self.dir.join(format!(".{}.tmp", Uuid::new_v4()));

        if let Err(e) = fs::write(&temp_path, content).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        // Set file permissions to 0600 (rw-------) before the value becomes visible
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) =
                fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600)).await
            {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e.into());
            }
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SecureFileStore {
    fn name(&self) -> &'static str {
        "secure-file"
    }

    async fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.value_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &StorageKey, value: String) -> StorageResult<()> {
        // The directory may have been removed since open (e.g. "clear data").
        self.ensure_dir().await?;
        let path = self.value_path(key);
        self.atomic_write(&path, &value).await?;
        debug!(key = %key, path = %path.display(), "Stored value");
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        match fs::remove_file(self.value_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (SecureFileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SecureFileStore::open(temp_dir.path().join("store")).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let (store, _temp_dir) = create_test_store().await;
        assert!(store.dir().is_dir());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (store, _temp_dir) = create_test_store().await;
        assert_eq!(store.get(&StorageKey::SESSION).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let (store, _temp_dir) = create_test_store().await;
        store.set(&StorageKey::SESSION, "\"a\"".to_string()).await.unwrap();
        store.set(&StorageKey::SESSION, "\"b\"".to_string()).await.unwrap();
        assert_eq!(store.get(&StorageKey::SESSION).await.unwrap().as_deref(), Some("\"b\""));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let (store, _temp_dir) = create_test_store().await;
        store.delete(&StorageKey::IS_ONBOARD).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let (store, _temp_dir) = create_test_store().await;
        store.set(&StorageKey::IS_ONBOARD, "true".to_string()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["isOnboard.json".to_string()]);
    }

    #[tokio::test]
    async fn test_set_recreates_removed_directory() {
        let (store, _temp_dir) = create_test_store().await;
        std::fs::remove_dir_all(store.dir()).unwrap();
        store.set(&StorageKey::SESSION, "\"tok\"".to_string()).await.unwrap();
        assert_eq!(store.get(&StorageKey::SESSION).await.unwrap().as_deref(), Some("\"tok\""));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_value_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp_dir) = create_test_store().await;
        store.set(&StorageKey::SESSION, "\"secret\"".to_string()).await.unwrap();

        let file_mode = std::fs::metadata(store.dir().join("session.json")).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777, 0o600);
        let dir_mode = std::fs::metadata(store.dir()).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }
}
