use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CrmError, Result};
use crate::models::OutputFormat;
use crate::repository::DEFAULT_STORAGE_KEY;
use crate::validation::InputValidator;
use crate::view::SortKey;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub seed: SeedConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: String, // "file", "sled" or "memory"
    pub directory: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub reset_on_startup: bool,
    pub default_sort: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub default_format: String,
    pub output_directory: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: "file".to_string(),
                directory: "data/store".to_string(),
                key: DEFAULT_STORAGE_KEY.to_string(),
            },
            seed: SeedConfig {
                path: "data/raw_leads.json".to_string(),
            },
            session: SessionConfig {
                reset_on_startup: true,
                default_sort: "reviews".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            export: ExportConfig {
                default_format: "csv".to_string(),
                output_directory: "./output".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration, reading `path` (required) on top of the default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            // Start with default values
            .set_default("storage.backend", defaults.storage.backend)?
            .set_default("storage.directory", defaults.storage.directory)?
            .set_default("storage.key", defaults.storage.key)?
            .set_default("seed.path", defaults.seed.path)?
            .set_default("session.reset_on_startup", defaults.session.reset_on_startup)?
            .set_default("session.default_sort", defaults.session.default_sort)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("export.default_format", defaults.export.default_format)?
            .set_default("export.output_directory", defaults.export.output_directory)?
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("coldcall").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Add environment variables with prefix, e.g. COLDCALL_STORAGE__BACKEND=sled
        let config = builder
            .add_source(
                Environment::with_prefix("COLDCALL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CrmError::InvalidConfig(format!("Failed to load configuration: {e}")))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| CrmError::InvalidConfig(format!("Failed to deserialize configuration: {e}")))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate storage config
        let valid_backends = ["file", "sled", "memory"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(CrmError::InvalidConfig(format!(
                "Invalid storage backend: {}. Must be one of: {valid_backends:?}",
                self.storage.backend
            )));
        }
        if self.storage.directory.trim().is_empty() && self.storage.backend != "memory" {
            return Err(CrmError::InvalidConfig("storage directory cannot be empty".to_string()));
        }
        InputValidator::validate_storage_key(&self.storage.key)?;

        // Validate session config
        self.sort_key()?;

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(CrmError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                self.logging.level
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(CrmError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {valid_formats:?}",
                self.logging.format
            )));
        }

        // Validate export config
        self.export_format()?;
        if self.export.output_directory.trim().is_empty() {
            return Err(CrmError::InvalidConfig("export output_directory cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Sort key the session starts with
    pub fn sort_key(&self) -> Result<SortKey> {
        self.session
            .default_sort
            .parse()
            .map_err(|e: CrmError| CrmError::InvalidConfig(e.to_string()))
    }

    /// Default export format
    pub fn export_format(&self) -> Result<OutputFormat> {
        self.export
            .default_format
            .parse()
            .map_err(|e: CrmError| CrmError::InvalidConfig(e.to_string()))
    }

    /// Seed file path
    #[must_use]
    pub fn seed_path(&self) -> PathBuf {
        PathBuf::from(&self.seed.path)
    }

    /// Log file path, if file logging is enabled
    #[must_use]
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file_path.as_ref().map(PathBuf::from)
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.backend, "file");
        assert_eq!(config.storage.key, "crm_coachs_nantes_v1");
        assert!(config.session.reset_on_startup);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.storage.backend = "postgres".to_string();
        assert!(config.validate().is_err());
    }
}
