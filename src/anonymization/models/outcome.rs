//! Anonymization result model

use crate::anonymization::report::SensitivityReport;
use crate::domain::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a single anonymize call together with its report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationOutcome {
    /// Text with every sensitive span replaced by its placeholder
    pub anonymized_text: String,
    /// Distinct values found, per category
    pub sensitivity_report: SensitivityReport,
    /// Human-readable rendering of the report
    pub formatted_report: String,
    /// Number of spans substituted (duplicates counted each time)
    pub replacements: usize,
    /// Placeholders minted by this call
    pub new_placeholders: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of anonymization
    pub timestamp: DateTime<Utc>,
}

impl AnonymizationOutcome {
    /// Create a new outcome
    pub fn new(
        anonymized_text: String,
        sensitivity_report: SensitivityReport,
        replacements: usize,
        new_placeholders: usize,
        processing_time_ms: u64,
    ) -> Self {
        let formatted_report = sensitivity_report.format_console();
        Self {
            anonymized_text,
            sensitivity_report,
            formatted_report,
            replacements,
            new_placeholders,
            processing_time_ms,
            timestamp: Utc::now(),
        }
    }

    /// Number of distinct values per category
    pub fn stats_by_category(&self) -> BTreeMap<Category, usize> {
        self.sensitivity_report
            .iter()
            .map(|(category, values)| (category.clone(), values.len()))
            .collect()
    }

    /// Check if any sensitive data was found
    pub fn has_detections(&self) -> bool {
        !self.sensitivity_report.is_empty()
    }
}
