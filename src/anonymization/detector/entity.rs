//! Model-backed entity detection
//!
//! The natural-language model is a pluggable capability behind
//! [`EntityRecognizer`]. [`EntityDetector`] wraps a recognizer, normalizes
//! its labels, validates its offsets and degrades to zero spans when the
//! model fails.

use super::SpanDetector;
use crate::anonymization::config::{DetectionConfig, EntityModel};
use crate::anonymization::models::{DetectionSource, SensitiveSpan};
use crate::domain::{Category, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Span produced by a recognizer, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedEntity {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Model label, e.g. `PERSON` or `PER`
    pub label: String,
}

impl RecognizedEntity {
    /// Create a new recognized entity
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

/// Entity recognition capability: segment text into labeled spans
///
/// Implementations report failures as
/// [`VeilError::DetectionUnavailable`](crate::domain::VeilError::DetectionUnavailable).
pub trait EntityRecognizer: Send + Sync {
    /// Segment text into labeled spans
    fn segment(&self, text: &str) -> Result<Vec<RecognizedEntity>>;

    /// Model name for logging
    fn name(&self) -> &str;
}

/// Recognizer used when no model is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledRecognizer;

impl EntityRecognizer for DisabledRecognizer {
    fn segment(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Lightweight rule model
///
/// Tags capitalized names that follow an honorific as `PERSON` and
/// capitalized word runs ending in a company suffix as `ORG`.
pub struct HeuristicRecognizer {
    person: Regex,
    org: Regex,
}

impl HeuristicRecognizer {
    /// Create the recognizer
    pub fn new() -> Result<Self> {
        let person = Regex::new(
            r"\b(?:Mr|Mrs|Ms|Miss|Dr|Prof)\.?\s+([A-Z][a-z]+(?:[-'][A-Z][a-z]+)?(?:\s+[A-Z][a-z]+(?:[-'][A-Z][a-z]+)?){0,2})",
        )?;
        let org = Regex::new(
            r"\b(?:[A-Z][\w&]*\s+){1,3}(?:Inc|Corp|Corporation|LLC|Ltd|GmbH|PLC|AG)\b",
        )?;
        Ok(Self { person, org })
    }
}

impl EntityRecognizer for HeuristicRecognizer {
    fn segment(&self, text: &str) -> Result<Vec<RecognizedEntity>> {
        let mut entities = Vec::new();

        for caps in self.person.captures_iter(text) {
            if let Some(name) = caps.get(1) {
                entities.push(RecognizedEntity::new(name.start(), name.end(), Category::PERSON));
            }
        }

        for matched in self.org.find_iter(text) {
            entities.push(RecognizedEntity::new(
                matched.start(),
                matched.end(),
                Category::ORG,
            ));
        }

        Ok(entities)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Entity detector wrapping a pluggable recognizer
pub struct EntityDetector {
    recognizer: Arc<dyn EntityRecognizer>,
    label_map: HashMap<String, String>,
    ignored_labels: HashSet<String>,
}

impl EntityDetector {
    /// Create a detector around a recognizer
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            label_map: HashMap::new(),
            ignored_labels: HashSet::new(),
        }
    }

    /// Build the detector described by the detection configuration
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        let recognizer: Arc<dyn EntityRecognizer> = match config.entity_model {
            EntityModel::None => Arc::new(DisabledRecognizer),
            EntityModel::Heuristic => Arc::new(HeuristicRecognizer::new()?),
        };

        Ok(Self::new(recognizer)
            .with_label_map(config.label_map.clone())
            .with_ignored_labels(config.ignored_labels.iter().cloned()))
    }

    /// Rename model labels before they become categories
    pub fn with_label_map<I>(mut self, label_map: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.label_map = label_map.into_iter().collect();
        self
    }

    /// Discard entities with these labels (matched after mapping)
    pub fn with_ignored_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.ignored_labels = labels.into_iter().collect();
        self
    }

    /// Swap the underlying recognizer, keeping label settings
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Name of the underlying recognizer
    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    fn to_span(&self, text: &str, entity: RecognizedEntity) -> Option<SensitiveSpan> {
        let label = self
            .label_map
            .get(&entity.label)
            .cloned()
            .unwrap_or(entity.label);

        if self.ignored_labels.contains(&label) {
            return None;
        }

        let category = Category::new(label).ok()?;
        let span = SensitiveSpan::from_range(
            text,
            entity.start,
            entity.end,
            category,
            DetectionSource::Entity,
        );
        if span.is_none() {
            tracing::debug!(
                recognizer = self.recognizer.name(),
                start = entity.start,
                end = entity.end,
                "Dropping entity with invalid offsets"
            );
        }
        span
    }
}

impl SpanDetector for EntityDetector {
    fn detect(&self, text: &str) -> Vec<SensitiveSpan> {
        let entities = match self.recognizer.segment(text) {
            Ok(entities) => entities,
            Err(e) => {
                tracing::warn!(
                    recognizer = self.recognizer.name(),
                    error = %e,
                    "Entity recognizer unavailable, continuing without entity spans"
                );
                return Vec::new();
            }
        };

        entities
            .into_iter()
            .filter_map(|entity| self.to_span(text, entity))
            .collect()
    }

    fn source(&self) -> DetectionSource {
        DetectionSource::Entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VeilError;

    struct FailingRecognizer;

    impl EntityRecognizer for FailingRecognizer {
        fn segment(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            Err(VeilError::DetectionUnavailable("model not loaded".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct FixedRecognizer(Vec<RecognizedEntity>);

    impl EntityRecognizer for FixedRecognizer {
        fn segment(&self, _text: &str) -> Result<Vec<RecognizedEntity>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_failing_recognizer_degrades_to_no_spans() {
        let detector = EntityDetector::new(Arc::new(FailingRecognizer));
        assert!(detector.detect("Jane Doe lives in Paris").is_empty());
    }

    #[test]
    fn test_label_map_and_ignored_labels() {
        let text = "Jane Doe lives in Paris since 2001";
        let detector = EntityDetector::new(Arc::new(FixedRecognizer(vec![
            RecognizedEntity::new(0, 8, "PER"),
            RecognizedEntity::new(18, 23, "LOC"),
            RecognizedEntity::new(30, 34, "DATE"),
        ])))
        .with_label_map([
            ("PER".to_string(), "PERSON".to_string()),
            ("LOC".to_string(), "LOCATION".to_string()),
        ])
        .with_ignored_labels(["DATE".to_string()]);

        let spans = detector.detect(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].category.as_str(), "PERSON");
        assert_eq!(spans[0].text, "Jane Doe");
        assert_eq!(spans[1].category.as_str(), "LOCATION");
        assert_eq!(spans[1].text, "Paris");
    }

    #[test]
    fn test_invalid_offsets_dropped() {
        let detector = EntityDetector::new(Arc::new(FixedRecognizer(vec![
            RecognizedEntity::new(0, 100, "PERSON"),
            RecognizedEntity::new(3, 1, "PERSON"),
        ])));
        assert!(detector.detect("short").is_empty());
    }

    #[test]
    fn test_heuristic_person_after_honorific() {
        let recognizer = HeuristicRecognizer::new().unwrap();
        let entities = recognizer.segment("Referred by Dr. Jane Smith yesterday").unwrap();
        let text = "Referred by Dr. Jane Smith yesterday";
        assert_eq!(entities.len(), 1);
        assert_eq!(&text[entities[0].start..entities[0].end], "Jane Smith");
        assert_eq!(entities[0].label, "PERSON");
    }

    #[test]
    fn test_heuristic_org_suffix() {
        let text = "We signed with Globex Corp last week";
        let recognizer = HeuristicRecognizer::new().unwrap();
        let entities = recognizer.segment(text).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(&text[entities[0].start..entities[0].end], "Globex Corp");
        assert_eq!(entities[0].label, "ORG");
    }

    #[test]
    fn test_disabled_recognizer() {
        let detector = EntityDetector::from_config(&DetectionConfig {
            entity_model: EntityModel::None,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(detector.recognizer_name(), "none");
        assert!(detector.detect("Dr. Jane Smith").is_empty());
    }
}
