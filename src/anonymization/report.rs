//! Sensitivity reporting
//!
//! A [`SensitivityReport`] lists, per category, the distinct original values
//! found in one input. Both the categories and the values inside each
//! category keep first-seen order, and the report serializes as a JSON
//! object in that order.

use crate::domain::Category;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Categorized summary of distinct sensitive values found in one input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensitivityReport {
    categories: Vec<(Category, Vec<String>)>,
}

impl SensitivityReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value under a category
    ///
    /// Returns `false` if the value was already recorded for that category.
    pub fn record(&mut self, category: &Category, value: &str) -> bool {
        let idx = match self.categories.iter().position(|(c, _)| c == category) {
            Some(idx) => idx,
            None => {
                self.categories.push((category.clone(), Vec::new()));
                self.categories.len() - 1
            }
        };

        let values = &mut self.categories[idx].1;
        if values.iter().any(|v| v == value) {
            return false;
        }
        values.push(value.to_string());
        true
    }

    /// Values recorded for a category
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(c, _)| c.as_str() == category)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate categories in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &[String])> {
        self.categories
            .iter()
            .map(|(category, values)| (category, values.as_slice()))
    }

    /// Categories in first-seen order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().map(|(category, _)| category)
    }

    /// Number of categories with at least one value
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if nothing was found
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total distinct values across all categories
    pub fn total_values(&self) -> usize {
        self.categories.iter().map(|(_, values)| values.len()).sum()
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        if self.is_empty() {
            output.push_str("No sensitive information detected.\n");
            return output;
        }

        output.push_str("SENSITIVITY REPORT\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  {} distinct value(s) in {} categor{}\n\n",
            self.total_values(),
            self.len(),
            if self.len() == 1 { "y" } else { "ies" }
        ));

        for (category, values) in self.iter() {
            output.push_str(&format!("  {} ({})\n", category, values.len()));
            for value in values {
                output.push_str(&format!("    • {}\n", value));
            }
        }

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for SensitivityReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (category, values) in &self.categories {
            map.serialize_entry(category.as_str(), values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SensitivityReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReportVisitor;

        impl<'de> Visitor<'de> for ReportVisitor {
            type Value = SensitivityReport;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category to list of values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut report = SensitivityReport::new();
                while let Some((category, values)) = access.next_entry::<Category, Vec<String>>()? {
                    for value in values {
                        report.record(&category, &value);
                    }
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(ReportVisitor)
    }
}

/// One row of the placeholder mapping view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingItem {
    /// Original sensitive value
    pub original_value: String,
    /// Placeholder issued for it
    pub placeholder: String,
}
