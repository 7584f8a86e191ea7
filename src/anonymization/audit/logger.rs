//! Audit logger for anonymization operations

use crate::anonymization::config::AuditConfig;
use crate::anonymization::models::Substitution;
use crate::domain::Result;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Operation recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    Anonymize,
    Deanonymize,
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditOperation::Anonymize => write!(f, "anonymize"),
            AuditOperation::Deanonymize => write!(f, "deanonymize"),
        }
    }
}

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    operation_id: String,
    operation: AuditOperation,
    spans: usize,
    new_placeholders: usize,
    unresolved: usize,
    processing_time_ms: u64,
    categories: BTreeMap<String, usize>,
    substitutions: Vec<AuditSubstitution>,
}

/// Audit substitution entry (with hashed value)
#[derive(Debug, Serialize)]
struct AuditSubstitution {
    category: String,
    placeholder: String,
    /// SHA-256 hash of the original value (never log plaintext)
    value_hash: String,
}

/// Audit logger for anonymize and deanonymize calls
///
/// Appends one line per call. Writes are serialized so concurrent callers
/// never interleave partial lines.
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger, creating the log directory if needed
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            write_lock: Mutex::new(()),
        })
    }

    /// Build the logger described by the audit configuration, if enabled
    pub fn from_config(config: &AuditConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(config.log_path.clone(), config.json_format).map(Some)
    }

    /// Path of the audit log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Record an anonymize call, returning its operation id
    pub fn log_anonymization(
        &self,
        substitutions: &[Substitution],
        processing_time_ms: u64,
    ) -> Result<Uuid> {
        let mut categories = BTreeMap::new();
        for substitution in substitutions {
            *categories
                .entry(substitution.span.category.to_string())
                .or_insert(0) += 1;
        }

        let operation_id = Uuid::new_v4();
        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            operation_id: operation_id.to_string(),
            operation: AuditOperation::Anonymize,
            spans: substitutions.len(),
            new_placeholders: substitutions.iter().filter(|s| s.created).count(),
            unresolved: 0,
            processing_time_ms,
            categories,
            substitutions: substitutions
                .iter()
                .map(|s| AuditSubstitution {
                    category: s.span.category.to_string(),
                    placeholder: s.placeholder.clone(),
                    value_hash: hash_value(&s.span.text),
                })
                .collect(),
        };

        self.write_entry(&entry)?;
        Ok(operation_id)
    }

    /// Record a deanonymize call, returning its operation id
    pub fn log_deanonymization(
        &self,
        resolved: usize,
        unresolved: usize,
        processing_time_ms: u64,
    ) -> Result<Uuid> {
        let operation_id = Uuid::new_v4();
        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            operation_id: operation_id.to_string(),
            operation: AuditOperation::Deanonymize,
            spans: resolved,
            new_placeholders: 0,
            unresolved,
            processing_time_ms,
            categories: BTreeMap::new(),
            substitutions: Vec::new(),
        };

        self.write_entry(&entry)?;
        Ok(operation_id)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry)?
        } else {
            format!(
                "[{}] {} {} | Spans: {} | New: {} | Unresolved: {} | Time: {}ms",
                entry.timestamp,
                entry.operation,
                entry.operation_id,
                entry.spans,
                entry.new_placeholders,
                entry.unresolved,
                entry.processing_time_ms
            )
        };

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;

        Ok(())
    }
}

/// Hash a sensitive value using SHA-256
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{DetectionSource, SensitiveSpan};
    use crate::domain::Category;
    use tempfile::tempdir;

    fn substitution(text: &str, category: &str, placeholder: &str) -> Substitution {
        Substitution {
            span: SensitiveSpan::from_range(
                text,
                0,
                text.len(),
                Category::new(category).unwrap(),
                DetectionSource::Pattern,
            )
            .unwrap(),
            placeholder: placeholder.to_string(),
            created: true,
        }
    }

    #[test]
    fn test_disabled_config_builds_no_logger() {
        let config = AuditConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(AuditLogger::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_hash_value() {
        let hash1 = hash_value("test@example.com");
        let hash2 = hash_value("test@example.com");
        let hash3 = hash_value("different@example.com");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_log_anonymization_never_writes_plaintext() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit").join("veil.log");
        let logger = AuditLogger::new(log_path.clone(), true).unwrap();

        let id = logger
            .log_anonymization(&[substitution("test@example.com", "EMAIL", "[EMAIL_1]")], 3)
            .unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains(&id.to_string()));
        assert!(content.contains("[EMAIL_1]"));
        assert!(content.contains(&hash_value("test@example.com")));
        assert!(!content.contains("test@example.com"));

        let line: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(line["operation"], "anonymize");
        assert_eq!(line["categories"]["EMAIL"], 1);
    }

    #[test]
    fn test_plain_text_format() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("veil.log");
        let logger = AuditLogger::new(log_path.clone(), false).unwrap();

        logger.log_deanonymization(2, 1, 0).unwrap();
        logger.log_deanonymization(0, 0, 0).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("deanonymize"));
        assert!(content.contains("Unresolved: 1"));
    }
}
