//! Durable key-value persistence port.
//!
//! Both aggregates persist through this one small interface so the backing
//! store can be swapped (files on disk, an embedded database, an in-memory
//! map for tests) without touching any aggregate logic.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;

/// String-valued, origin-scoped durable storage. `get` of a missing key is
/// `Ok(None)`; `set` replaces any existing value for the key.
pub trait KeyValue {
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the value cannot be written (e.g. the
    /// store is full or unavailable). The caller's in-memory state remains
    /// valid; only the persisted copy is stale.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// File-backed store: one `<key>.json` file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValue for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root).map_err(|e| StoreError::Io {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().expect("kv mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().expect("kv mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(test: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lookbook-kv-{test}-{}", std::process::id()))
    }

    #[test]
    fn memory_kv_roundtrip() {
        let kv = MemoryKv::new();
        assert!(kv.get("missing").unwrap().is_none());

        kv.set("catalog", r#"{"a":1}"#).unwrap();
        assert_eq!(kv.get("catalog").unwrap().as_deref(), Some(r#"{"a":1}"#));

        kv.set("catalog", r#"{"a":2}"#).unwrap();
        assert_eq!(kv.get("catalog").unwrap().as_deref(), Some(r#"{"a":2}"#));
    }

    #[test]
    fn file_kv_missing_key_is_none() {
        let root = temp_root("missing");
        let kv = FileKv::new(&root);
        assert!(kv.get("nothing-here").unwrap().is_none());
    }

    #[test]
    fn file_kv_roundtrip_creates_root_dir() {
        let root = temp_root("roundtrip");
        let _ = std::fs::remove_dir_all(&root);

        let kv = FileKv::new(&root);
        kv.set("catalog", r#"{"version":1}"#).unwrap();
        assert_eq!(
            kv.get("catalog").unwrap().as_deref(),
            Some(r#"{"version":1}"#)
        );

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn file_kv_keys_are_independent_files() {
        let root = temp_root("independent");
        let _ = std::fs::remove_dir_all(&root);

        let kv = FileKv::new(&root);
        kv.set("catalog", "a").unwrap();
        kv.set("bundles", "b").unwrap();

        assert_eq!(kv.get("catalog").unwrap().as_deref(), Some("a"));
        assert_eq!(kv.get("bundles").unwrap().as_deref(), Some("b"));
        assert!(root.join("catalog.json").exists());
        assert!(root.join("bundles.json").exists());

        let _ = std::fs::remove_dir_all(&root);
    }
}
