//! The string-keyed storage port and its two backends.
//!
//! Reads never fail: an unreadable backend behaves as if the key were absent.
//! Writes return [`StoreError`] so callers can decide whether to surface it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;

/// A persistent string-keyed get/set store.
///
/// Implementations must be shareable across components (`Send + Sync`); each
/// operation is atomic on its own, but read-modify-write sequences built on
/// top are not.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw stored text, or `None` if the key is absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot persist the value.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes `key`; a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot persist the removal.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys currently present, in sorted order.
    fn keys(&self) -> Vec<String>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local store, used in tests and for ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with raw entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        lock(&self.entries).insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        lock(&self.entries).keys().cloned().collect()
    }
}

/// Store backed by one JSON object document on disk (`{"key": "raw text"}`).
///
/// The document is re-read on every operation so that other processes'
/// writes are visible. Each write goes to its own uniquely named sibling temp
/// file that is then renamed over the document. Concurrent writers are
/// last-write-wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> BTreeMap<String, String> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage document unreadable");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str::<BTreeMap<String, String>>(&text) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "storage document is not a string map; treating as empty"
                );
                BTreeMap::new()
            }
        }
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };

        let text = serde_json::to_string_pretty(document).map_err(|source| {
            StoreError::Serialize {
                key: "<document>".to_string(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = self.path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        let written = std::fs::write(&tmp, text).and_then(|()| std::fs::rename(&tmp, &self.path));
        if written.is_err() {
            std::fs::remove_file(&tmp).ok();
        }
        written.map_err(io_err)
    }

    fn update<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = lock(&self.write_lock);
        let mut document = self.read_document();
        apply(&mut document);
        self.write_document(&document)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_document().remove(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.update(|document| {
            document.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|document| {
            document.remove(key);
        })
    }

    fn keys(&self) -> Vec<String> {
        self.read_document().into_keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("carefind-store-{}", uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("favorites").is_none());
        store.set("favorites", "[1]".to_string()).unwrap();
        assert_eq!(store.get("favorites").as_deref(), Some("[1]"));
        store.remove("favorites").unwrap();
        assert!(store.get("favorites").is_none());
    }

    #[test]
    fn memory_store_keys_are_sorted() {
        let store = MemoryStore::with_entries([("b", "1"), ("a", "2")]);
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn file_store_missing_file_reads_as_empty() {
        let store = FileStore::new(temp_path());
        assert!(store.get("search_history").is_none());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let path = temp_path();
        FileStore::new(&path)
            .set("search_history", r#"["デイ"]"#.to_string())
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("search_history").as_deref(), Some(r#"["デイ"]"#));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn file_store_sees_writes_from_another_instance() {
        let path = temp_path();
        let first = FileStore::new(&path);
        let second = FileStore::new(&path);
        first.set("favorites", "[1]".to_string()).unwrap();
        second.set("search_history", "[]".to_string()).unwrap();
        assert_eq!(first.get("search_history").as_deref(), Some("[]"));
        assert_eq!(second.get("favorites").as_deref(), Some("[1]"));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn file_store_corrupt_document_reads_as_empty_and_is_replaced_on_write() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("favorites").is_none());
        store.set("favorites", "[2]".to_string()).unwrap();
        assert_eq!(store.get("favorites").as_deref(), Some("[2]"));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn file_store_concurrent_writers_leave_one_readable_document() {
        let path = temp_path();
        std::thread::scope(|scope| {
            for key in ["favorites", "search_history"] {
                let store = FileStore::new(&path);
                scope.spawn(move || {
                    for round in 0..50 {
                        store.set(key, format!("[{round}]")).unwrap();
                    }
                });
            }
        });

        let text = std::fs::read_to_string(&path).unwrap();
        let document: BTreeMap<String, String> = serde_json::from_str(&text).unwrap();
        assert!(!document.is_empty());
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1, "temp files must not outlive a write");
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
