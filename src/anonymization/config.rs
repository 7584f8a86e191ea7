//! Anonymization configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What `deanonymize` does with a placeholder-shaped token it has never issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPlaceholderPolicy {
    /// Leave the token verbatim in the output
    #[default]
    Leave,
    /// Fail with `VeilError::UnknownPlaceholder`
    Error,
}

/// Entity recognition model selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntityModel {
    /// No model; only patterns and custom terms are used
    None,
    /// Built-in rule model for honorific names and company suffixes
    #[default]
    Heuristic,
}

/// Anonymizer behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Match custom terms case-sensitively
    #[serde(default)]
    pub case_sensitive_terms: bool,

    /// Persist mappings and terms after each mutating operation
    #[serde(default = "default_save_mappings")]
    pub save_mappings: bool,

    /// Handling of unknown placeholders during deanonymization
    #[serde(default)]
    pub unknown_placeholder: UnknownPlaceholderPolicy,
}

fn default_save_mappings() -> bool {
    true
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            case_sensitive_terms: false,
            save_mappings: default_save_mappings(),
            unknown_placeholder: UnknownPlaceholderPolicy::default(),
        }
    }
}

impl AnonymizerConfig {
    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_ANONYMIZER_CASE_SENSITIVE_TERMS") {
            self.case_sensitive_terms = val
                .parse()
                .context("Invalid VEIL_ANONYMIZER_CASE_SENSITIVE_TERMS value")?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZER_SAVE_MAPPINGS") {
            self.save_mappings = val
                .parse()
                .context("Invalid VEIL_ANONYMIZER_SAVE_MAPPINGS value")?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZER_UNKNOWN_PLACEHOLDER") {
            self.unknown_placeholder = match val.to_lowercase().as_str() {
                "leave" => UnknownPlaceholderPolicy::Leave,
                "error" => UnknownPlaceholderPolicy::Error,
                _ => anyhow::bail!("Invalid VEIL_ANONYMIZER_UNKNOWN_PLACEHOLDER: {}", val),
            };
        }

        Ok(())
    }
}

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Entity recognition model
    #[serde(default)]
    pub entity_model: EntityModel,

    /// Path to pattern library TOML file (built-in library when unset)
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Patterns below this confidence are skipped
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Rename model labels (e.g. `PER` to `PERSON`)
    #[serde(default)]
    pub label_map: BTreeMap<String, String>,

    /// Model labels to discard after mapping
    #[serde(default)]
    pub ignored_labels: Vec<String>,
}

fn default_confidence_threshold() -> f32 {
    0.7
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            entity_model: EntityModel::default(),
            pattern_library: None,
            confidence_threshold: default_confidence_threshold(),
            label_map: BTreeMap::new(),
            ignored_labels: Vec::new(),
        }
    }
}

impl DetectionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!(
                "detection.confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            );
        }

        for (from, to) in &self.label_map {
            if from.trim().is_empty() || to.trim().is_empty() {
                anyhow::bail!("detection.label_map entries cannot be empty");
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_DETECTION_ENTITY_MODEL") {
            self.entity_model = match val.to_lowercase().as_str() {
                "none" => EntityModel::None,
                "heuristic" => EntityModel::Heuristic,
                _ => anyhow::bail!("Invalid VEIL_DETECTION_ENTITY_MODEL: {}", val),
            };
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = val
                .parse()
                .context("Invalid VEIL_DETECTION_CONFIDENCE_THRESHOLD value")?;
        }

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/veil.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path cannot be empty when audit logging is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid VEIL_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("VEIL_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("VEIL_AUDIT_JSON_FORMAT") {
            self.json_format = val.parse().context("Invalid VEIL_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}
