use std::path::Path;

use crate::error::{CrmError, Result};

/// Longest notes text accepted on a lead
pub const MAX_NOTES_LEN: usize = 10_000;

/// Longest quick offset accepted when scheduling a call-back
pub const MAX_OFFSET_DAYS: u64 = 365;

/// Validation utilities for input sanitization and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a lead id supplied by the user
    pub fn validate_lead_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(CrmError::InvalidInput("Lead id cannot be empty".to_string()));
        }

        if id.len() > 512 {
            return Err(CrmError::InvalidInput("Lead id too long (max 512 characters)".to_string()));
        }

        Ok(())
    }

    /// Validate the storage key leads are persisted under
    pub fn validate_storage_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(CrmError::InvalidConfig("Storage key cannot be empty".to_string()));
        }

        if key.len() > 128 {
            return Err(CrmError::InvalidConfig("Storage key too long (max 128 characters)".to_string()));
        }

        // The file backend uses the key as a file name
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err(CrmError::InvalidConfig(format!(
                "Storage key contains invalid characters: {key}"
            )));
        }

        Ok(())
    }

    /// Validate notes text, stripping control characters and keeping everything else verbatim
    pub fn validate_notes(notes: &str) -> Result<String> {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(CrmError::InvalidInput(format!(
                "Notes too long (max {MAX_NOTES_LEN} characters)"
            )));
        }

        Ok(Self::sanitize_text(notes))
    }

    /// Validate a quick call-back offset in days
    pub fn validate_offset_days(days: u64) -> Result<()> {
        if days == 0 {
            return Err(CrmError::InvalidInput("Offset must be at least 1 day".to_string()));
        }

        if days > MAX_OFFSET_DAYS {
            return Err(CrmError::InvalidInput(format!(
                "Offset too large (max {MAX_OFFSET_DAYS} days)"
            )));
        }

        Ok(())
    }

    /// Validate a search query
    pub fn validate_search_query(query: &str) -> Result<()> {
        if query.len() > 200 {
            return Err(CrmError::InvalidInput("Search query too long (max 200 characters)".to_string()));
        }

        if query.contains('\0') {
            return Err(CrmError::InvalidInput("Search query contains invalid characters".to_string()));
        }

        Ok(())
    }

    /// Validate file path
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.is_empty() {
            return Err(CrmError::InvalidInput("File path cannot be empty".to_string()));
        }

        if path_str.contains('\0') {
            return Err(CrmError::InvalidInput("File path contains invalid characters".to_string()));
        }

        if path_str.len() > 4096 {
            return Err(CrmError::InvalidInput("File path too long (max 4096 characters)".to_string()));
        }

        Ok(())
    }

    /// Strip control characters other than newline and tab.
    ///
    /// Surrounding whitespace is kept: notes are stored as typed.
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect()
    }
}
