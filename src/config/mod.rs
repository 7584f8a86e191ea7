//! Configuration management for Veil.
//!
//! Veil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_*` environment overrides
//! - Default values for every section
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//! println!("State directory: {}", config.storage.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`AnonymizerConfig`] - term case policy, persistence cadence, unknown placeholder policy
//! - [`DetectionConfig`] - entity model, pattern library, label mapping
//! - [`StorageConfig`] - where mappings and custom terms live
//! - [`AuditConfig`] - hashed audit trail
//! - [`LoggingConfig`] - file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymizer]
//! save_mappings = true
//!
//! [storage]
//! backend = "file"
//! path = "${VEIL_STATE_DIR}"
//!
//! [domain_specific_terms]
//! ORG = ["Acme Corp"]
//! ```

pub mod loader;
pub mod schema;

pub use crate::anonymization::config::{
    AnonymizerConfig, AuditConfig, DetectionConfig, EntityModel, UnknownPlaceholderPolicy,
};
pub use loader::{load_config, load_config_from_str};
pub use schema::{ApplicationConfig, LoggingConfig, StorageBackend, StorageConfig, VeilConfig};
