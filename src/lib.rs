//! Cold Call CRM - Lead Tracking for Phone Prospecting
//!
//! A Rust library for tracking prospect lists through a calling campaign,
//! backed by a local key-value store.
//!
//! # Features
//!
//! - Seed leads from raw business listings with stable ids
//! - Record call outcomes, call-back days and notes
//! - Search, filter and sort the lead list
//! - Dashboard counters (calls made, contact rate, meetings set)
//! - Export call lists to TXT, CSV or JSON

/// Sled-backed key-value store
pub mod cache;
/// Configuration management
pub mod config;
/// Dashboard counters
pub mod dashboard;
/// Error types
pub mod error;
/// Lead export
pub mod file_writer;
/// Status transitions and call scheduling
pub mod lifecycle;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Lead persistence
pub mod repository;
/// Application state and events
pub mod service;
/// Key-value store abstraction
pub mod store;
/// Raw record transform and seed loading
pub mod transform;
/// Date helpers
pub mod utils;
/// Input validation and sanitization
pub mod validation;
/// Filtering and sorting
pub mod view;

// Re-export key components for easier access
pub use dashboard::DashboardStats;
pub use error::{CrmError, Result};
pub use models::{Lead, LeadStatus, OutputFormat, RawLead};
pub use repository::LeadRepository;
pub use service::{AppState, Event, LeadService, StartupPolicy};
pub use view::{FilterState, SortKey};
