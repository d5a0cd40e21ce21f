//! Error types for the coldcall-crm library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use thiserror::Error;

/// Errors that can occur in the coldcall-crm application.
#[derive(Error, Debug)]
pub enum CrmError {
    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No lead with the given id
    #[error("Lead not found: {0}")]
    LeadNotFound(String),

    /// Edit not allowed in the lead's current status
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with CrmError
pub type Result<T> = std::result::Result<T, CrmError>;

impl From<anyhow::Error> for CrmError {
    fn from(err: anyhow::Error) -> Self {
        CrmError::Other(err.to_string())
    }
}

impl From<sled::Error> for CrmError {
    fn from(err: sled::Error) -> Self {
        CrmError::Storage(err.to_string())
    }
}

impl From<config::ConfigError> for CrmError {
    fn from(err: config::ConfigError) -> Self {
        CrmError::InvalidConfig(err.to_string())
    }
}
