//! String key-value storage.
//!
//! SchoolHub persists every collection as a JSON blob under a well-known
//! key. This module provides the trait the store writes through plus two
//! backends: a directory of `<key>.json` files and an in-memory map used
//! for the session-scoped fallback copy and in tests.
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_core::kv::{FileKeyValueStore, KeyValueStore};
//!
//! let kv = FileKeyValueStore::new("storage/data");
//! kv.set("darkMode", "true".to_string()).await?;
//! assert_eq!(kv.get("darkMode").await?.as_deref(), Some("true"));
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;

use thiserror::Error;
use tokio::fs;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Abstract key-value backend.
///
/// Values are opaque strings; callers are responsible for (de)serializing.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// List stored keys starting with `prefix`, sorted.
    fn keys<'a>(&'a self, prefix: &'a str) -> StorageFuture<'a, Vec<String>>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key must not be empty".to_string()));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(StorageError::InvalidKey(format!(
            "'{}' may only contain letters, digits, '_' and '-'",
            key
        )));
    }

    Ok(())
}

/// Directory-backed storage, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async move {
            validate_key(key)?;

            match fs::read_to_string(self.path_for(key)).await {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            validate_key(key)?;
            fs::create_dir_all(&self.base_dir).await?;

            // Write-then-rename so a crash never leaves a half-written blob.
            let target = self.path_for(key);
            let staging = self.base_dir.join(format!(".{}.json.tmp", key));
            fs::write(&staging, value.as_bytes()).await?;
            fs::rename(&staging, &target).await?;

            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            validate_key(key)?;

            match fs::remove_file(self.path_for(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn keys<'a>(&'a self, prefix: &'a str) -> StorageFuture<'a, Vec<String>> {
        Box::pin(async move {
            let mut entries = match fs::read_dir(&self.base_dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            };

            let mut keys = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                if let Some(key) = name.strip_suffix(".json") {
                    if key.starts_with(prefix) && validate_key(key).is_ok() {
                        keys.push(key.to_string());
                    }
                }
            }

            keys.sort();
            Ok(keys)
        })
    }
}

/// Process-local storage. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(async move {
            validate_key(key)?;
            Ok(self.entries().get(key).cloned())
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            validate_key(key)?;
            self.entries().insert(key.to_string(), value);
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            validate_key(key)?;
            self.entries().remove(key);
            Ok(())
        })
    }

    fn keys<'a>(&'a self, prefix: &'a str) -> StorageFuture<'a, Vec<String>> {
        Box::pin(async move {
            Ok(self
                .entries()
                .keys()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("schoolHubData").is_ok());
        assert!(validate_key("SHARED_USERS_1700000000000").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let kv = MemoryKeyValueStore::new();
        assert_eq!(kv.get("darkMode").await.unwrap(), None);

        kv.set("darkMode", "true".to_string()).await.unwrap();
        assert_eq!(kv.get("darkMode").await.unwrap().as_deref(), Some("true"));

        kv.remove("darkMode").await.unwrap();
        assert_eq!(kv.get("darkMode").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_keys_by_prefix() {
        let kv = MemoryKeyValueStore::new();
        kv.set("SHARED_USERS_2", "[]".to_string()).await.unwrap();
        kv.set("SHARED_USERS_1", "[]".to_string()).await.unwrap();
        kv.set("auditLog", "[]".to_string()).await.unwrap();

        let keys = kv.keys("SHARED_USERS_").await.unwrap();
        assert_eq!(keys, vec!["SHARED_USERS_1", "SHARED_USERS_2"]);
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKeyValueStore::new(dir.path().join("data"));

        assert_eq!(kv.get("schoolHubData").await.unwrap(), None);
        kv.set("schoolHubData", r#"{"classes":[]}"#.to_string())
            .await
            .unwrap();
        assert_eq!(
            kv.get("schoolHubData").await.unwrap().as_deref(),
            Some(r#"{"classes":[]}"#)
        );
        assert!(dir.path().join("data/schoolHubData.json").exists());

        kv.remove("schoolHubData").await.unwrap();
        kv.remove("schoolHubData").await.unwrap();
        assert_eq!(kv.get("schoolHubData").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_keys_skips_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKeyValueStore::new(dir.path());
        kv.set("SHARED_USERS_5", "[]".to_string()).await.unwrap();
        std::fs::write(dir.path().join(".SHARED_USERS_6.json.tmp"), "[]").unwrap();

        assert_eq!(kv.keys("SHARED_USERS_").await.unwrap(), vec!["SHARED_USERS_5"]);
        assert!(kv.keys("").await.unwrap().contains(&"SHARED_USERS_5".to_string()));
    }

    #[tokio::test]
    async fn test_file_store_missing_dir_has_no_keys() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKeyValueStore::new(dir.path().join("missing"));
        assert!(kv.keys("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_invalid_key() {
        let kv = MemoryKeyValueStore::new();
        let err = kv.set("../x", String::new()).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
