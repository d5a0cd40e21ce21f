use std::path::Path;

use tracing::debug;

use crate::error::{CrmError, Result};
use crate::store::KeyValueStore;

/// Embedded sled database used as a key-value store
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open (or create) the database at `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let db = sled::open(dir)?;
        debug!(path = %dir.display(), "Opened sled store");

        Ok(Self { db })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| CrmError::Storage(format!("Value under {key} is not UTF-8: {e}"))),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}
