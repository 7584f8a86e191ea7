//! Sensitive span detection
//!
//! Provides the trait-based detection interface and the two automated
//! detectors: model-backed entity recognition and structural patterns.
//! Operator-registered literal terms live in
//! [`terms`](crate::anonymization::terms).

pub mod entity;
pub mod pattern;
pub mod patterns;

pub use entity::{
    DisabledRecognizer, EntityDetector, EntityRecognizer, HeuristicRecognizer, RecognizedEntity,
};
pub use pattern::PatternDetector;

use crate::anonymization::models::{DetectionSource, SensitiveSpan};

/// Trait for span detector implementations
///
/// Detectors are pure with respect to shared state and never fail: a
/// detector whose backing capability is unavailable reports zero spans.
pub trait SpanDetector: Send + Sync {
    /// Detect sensitive spans in text
    fn detect(&self, text: &str) -> Vec<SensitiveSpan>;

    /// Source tag attached to every span this detector produces
    fn source(&self) -> DetectionSource;
}
