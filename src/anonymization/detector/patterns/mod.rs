//! Pattern library for structural detection

use crate::domain::Category;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this rule
    pub patterns: Vec<String>,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Category label emitted for matches
    pub category: String,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Rule name from the library
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Category label
    pub category: Category,
    /// Confidence score
    pub confidence: f32,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Pattern registry for structural detection
///
/// Rules are kept in name order so detection output is deterministic.
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    patterns_by_category: HashMap<Category, Vec<CompiledPattern>>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();
        let mut patterns_by_category: HashMap<Category, Vec<CompiledPattern>> = HashMap::new();

        for (name, def) in library.patterns {
            let category = Category::new(def.category.as_str())
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid category in pattern '{name}'"))?;

            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Confidence for pattern '{name}' must be between 0.0 and 1.0, got {}",
                    def.confidence
                );
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str)
                    .with_context(|| format!("Invalid regex in pattern '{name}': {pattern_str}"))?;

                let compiled = CompiledPattern {
                    name: name.clone(),
                    regex,
                    category: category.clone(),
                    confidence: def.confidence,
                };

                patterns.push(compiled.clone());
                patterns_by_category
                    .entry(category.clone())
                    .or_default()
                    .push(compiled);
            }
        }

        Ok(Self {
            patterns,
            patterns_by_category,
        })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns for a specific category
    pub fn patterns_for_category(&self, category: &str) -> Option<&[CompiledPattern]> {
        let category = Category::new(category).ok()?;
        self.patterns_by_category
            .get(&category)
            .map(|v| v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_patterns() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(!registry.all_patterns().is_empty());
    }

    #[test]
    fn test_email_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let email_patterns = registry.patterns_for_category("EMAIL").unwrap();
        assert!(!email_patterns.is_empty());

        let pattern = &email_patterns[0];
        assert!(pattern.regex.is_match("test@example.com"));
        assert!(!pattern.regex.is_match("not-an-email"));
    }

    #[test]
    fn test_phone_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let phone_patterns = registry.patterns_for_category("PHONE").unwrap();

        for text in ["Call me at (555) 123-4567", "555-123-4567", "+44 20 7946 0958"] {
            assert!(
                phone_patterns.iter().any(|p| p.regex.is_match(text)),
                "expected a phone match in {text:?}"
            );
        }
    }

    #[test]
    fn test_custom_category_in_library() {
        let registry = PatternRegistry::from_toml(
            r#"
[patterns.ticket]
category = "TICKET_ID"
confidence = 0.9
patterns = ['\bTKT-\d{6}\b']
"#,
        )
        .unwrap();

        let patterns = registry.patterns_for_category("TICKET_ID").unwrap();
        assert!(patterns[0].regex.is_match("see TKT-004211"));
        assert_eq!(patterns[0].name, "ticket");
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let result = PatternRegistry::from_toml(
            r#"
[patterns.broken]
category = "X"
confidence = 0.9
patterns = ['(unclosed']
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let result = PatternRegistry::from_toml(
            r#"
[patterns.loose]
category = "X"
confidence = 2.0
patterns = ['x']
"#,
        );
        assert!(result.is_err());
    }
}
