//! Lead persistence on top of a key-value store.
//!
//! Storage failures never reach the caller: a failed read is treated as "no
//! data" and a failed write is dropped. Both are logged.

use metrics::counter;
use tracing::{debug, error};

use crate::error::Result;
use crate::metrics::STORAGE_FAILURES_TOTAL;
use crate::models::Lead;
use crate::store::KeyValueStore;

/// Default key the lead list is stored under
pub const DEFAULT_STORAGE_KEY: &str = "crm_coachs_nantes_v1";

/// Reads and writes the whole lead list under one key
pub struct LeadRepository {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl LeadRepository {
    /// Repository storing under `key` in `store`
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key the list is stored under
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored leads, or `None` when nothing is stored or the read fails
    #[must_use]
    pub fn load_leads(&self) -> Option<Vec<Lead>> {
        match self.try_load() {
            Ok(leads) => leads,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to load leads from storage");
                counter!(STORAGE_FAILURES_TOTAL, "op" => "read").increment(1);
                None
            },
        }
    }

    /// Persist `leads`, returning whether the write went through
    pub fn save_leads(&self, leads: &[Lead]) -> bool {
        match self.try_save(leads) {
            Ok(()) => {
                debug!(key = %self.key, count = leads.len(), "Saved leads");
                true
            },
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to save leads to storage");
                false
            },
        }
    }

    fn try_load(&self) -> Result<Option<Vec<Lead>>> {
        match self.store.get(&self.key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn try_save(&self, leads: &[Lead]) -> Result<()> {
        let json = serde_json::to_string(leads)?;
        self.store.set(&self.key, &json)
    }
}
