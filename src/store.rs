//! Key-value stores the lead list is persisted in.
//!
//! A store maps string keys to string values. The file store keeps one
//! `<key>.json` file per key in a directory, the sled store (see
//! [`crate::cache`]) keeps values in an embedded database, and the memory
//! store keeps them in-process.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cache::SledStore;
use crate::config::StorageConfig;
use crate::error::{CrmError, Result};

/// A string key-value store
pub trait KeyValueStore {
    /// Value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Directory-backed store, one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote store file");
        Ok(())
    }
}

/// In-process store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Open the store selected by `config`
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>> {
    let dir = Path::new(&config.directory);
    match config.backend.as_str() {
        "file" => Ok(Box::new(FileStore::new(dir))),
        "sled" => Ok(Box::new(SledStore::open(dir)?)),
        "memory" => Ok(Box::new(MemoryStore::new())),
        other => Err(CrmError::InvalidConfig(format!(
            "Unknown storage backend: {other}. Must be one of: file, sled, memory"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("leads").unwrap(), None);
        store.set("leads", "[]").unwrap();
        assert_eq!(store.get("leads").unwrap().as_deref(), Some("[]"));
        assert!(store.path_for("leads").exists());
    }
}
