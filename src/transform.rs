//! Raw record transform and seed loading.
//!
//! Turns imported prospect records into tracked leads: synthesizes a stable id
//! and attaches default call-tracking fields.

use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{CrmError, Result};
use crate::models::{Lead, RawLead};

/// Converts raw import records into leads
pub struct LeadTransformer {
    non_alphanumeric: Regex,
}

impl LeadTransformer {
    /// Create a new transformer
    pub fn new() -> Result<Self> {
        let non_alphanumeric = Regex::new(r"[^a-zA-Z0-9]")
            .map_err(|e| CrmError::Other(format!("Failed to compile id regex: {e}")))?;

        Ok(Self { non_alphanumeric })
    }

    /// Derive the id for a raw record at `index` in its import list.
    ///
    /// Records with both a title and a phone get `<title>-<phone>` with every
    /// character outside `[a-zA-Z0-9]` replaced by `-`, lowercased. Anything
    /// else falls back to `lead-<index>`.
    #[must_use]
    pub fn lead_id(&self, raw: &RawLead, index: usize) -> String {
        let title = raw.title.as_deref().filter(|t| !t.is_empty());
        let phone = raw.phone.as_deref().filter(|p| !p.is_empty());

        match (title, phone) {
            (Some(title), Some(phone)) => self
                .non_alphanumeric
                .replace_all(&format!("{title}-{phone}"), "-")
                .to_lowercase(),
            _ => format!("lead-{index}"),
        }
    }

    /// Build a lead from a raw record
    #[must_use]
    pub fn transform(&self, raw: RawLead, index: usize) -> Lead {
        let id = self.lead_id(&raw, index);
        Lead::from_raw(raw, id)
    }

    /// Transform a whole import list, in order
    #[must_use]
    pub fn transform_all(&self, raws: Vec<RawLead>) -> Vec<Lead> {
        let leads: Vec<Lead> = raws
            .into_iter()
            .enumerate()
            .map(|(index, raw)| self.transform(raw, index))
            .collect();
        debug!(count = leads.len(), "Transformed raw records into leads");
        leads
    }
}

/// Load the seed list of raw records from a JSON array file.
///
/// A missing file is an empty seed; an unreadable or malformed one is an error.
pub fn load_seed(path: &Path) -> Result<Vec<RawLead>> {
    if !path.exists() {
        warn!(path = %path.display(), "Seed file not found, starting with no leads");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let raws: Vec<RawLead> = serde_json::from_str(&content)?;
    info!(path = %path.display(), count = raws.len(), "Loaded seed records");
    Ok(raws)
}
