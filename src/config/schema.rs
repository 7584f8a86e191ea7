//! Configuration schema types
//!
//! This module defines the configuration structure for Veil.

use crate::anonymization::config::{AnonymizerConfig, AuditConfig, DetectionConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Anonymizer behavior
    #[serde(default)]
    pub anonymizer: AnonymizerConfig,

    /// Detector settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Persistence of mappings and custom terms
    #[serde(default)]
    pub storage: StorageConfig,

    /// Audit logging
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Custom terms registered at startup, keyed by category
    #[serde(default)]
    pub domain_specific_terms: BTreeMap<String, Vec<String>>,
}

impl VeilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detection.validate().map_err(|e| format!("{e:#}"))?;
        self.storage.validate()?;
        self.audit.validate().map_err(|e| format!("{e:#}"))?;
        self.logging.validate()?;

        for category in self.domain_specific_terms.keys() {
            if category.trim().is_empty() {
                return Err("domain_specific_terms contains an empty category name".to_string());
            }
        }

        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON documents in a local directory
    #[default]
    File,
    /// In-process only, lost on exit
    Memory,
}

/// State persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend used for mappings and custom terms
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding `mappings.json` and `terms.json`
    #[serde(default = "default_state_path")]
    pub path: PathBuf,

    /// Start from empty state when the stored snapshot is corrupt
    #[serde(default)]
    pub recover_corrupt_state: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_state_path(),
            recover_corrupt_state: false,
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backend == StorageBackend::File && self.path.as_os_str().is_empty() {
            return Err("storage.path cannot be empty when backend = 'file'".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./state")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_valid() {
        let config: VeilConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.anonymizer.save_mappings);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = VeilConfig::default();
        config.application.log_level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level"));
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = VeilConfig::default();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_domain_terms_parse() {
        let config: VeilConfig = toml::from_str(
            r#"
[domain_specific_terms]
ORG = ["Acme Corp", "Bank of X"]
PROJECT = ["Bluebird"]
"#,
        )
        .unwrap();

        assert_eq!(config.domain_specific_terms.len(), 2);
        assert_eq!(config.domain_specific_terms["ORG"], vec!["Acme Corp", "Bank of X"]);
    }

    #[test]
    fn test_memory_backend() {
        let config: VeilConfig = toml::from_str(
            r#"
[storage]
backend = "memory"
"#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }
}
