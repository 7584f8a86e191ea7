//! Regex-based structural detector

use super::{patterns::PatternRegistry, SpanDetector};
use crate::anonymization::models::{DetectionSource, SensitiveSpan};
use anyhow::Result;
use std::sync::Arc;

/// Regex-based detector for emails, phone numbers and other structured data
pub struct PatternDetector {
    pattern_registry: Arc<PatternRegistry>,
    confidence_threshold: f32,
}

impl PatternDetector {
    /// Create a new pattern detector with the built-in library
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new pattern detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            confidence_threshold: 0.7,
        }
    }

    /// Set the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Get the confidence threshold
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }
}

impl SpanDetector for PatternDetector {
    fn detect(&self, text: &str) -> Vec<SensitiveSpan> {
        let mut spans = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            if pattern.confidence < self.confidence_threshold {
                continue;
            }

            for matched in pattern.regex.find_iter(text) {
                if let Some(span) = SensitiveSpan::from_range(
                    text,
                    matched.start(),
                    matched.end(),
                    pattern.category.clone(),
                    DetectionSource::Pattern,
                ) {
                    spans.push(span);
                }
            }
        }

        tracing::trace!(spans = spans.len(), "Pattern detection complete");
        spans
    }

    fn source(&self) -> DetectionSource {
        DetectionSource::Pattern
    }
}
