//! Sensitive span data model

use crate::domain::Category;
use serde::{Deserialize, Serialize};

/// Detector that produced a span
///
/// Ordering doubles as overlap priority: when two spans overlap, the one
/// with the higher source wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Entity recognition model
    Entity,
    /// Structural regex rule
    Pattern,
    /// Operator-registered literal term
    Custom,
}

/// A contiguous range of text with an assigned category
///
/// Offsets are byte offsets into the UTF-8 input and always fall on
/// character boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveSpan {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Original text covered by the span
    pub text: String,
    /// Category label
    pub category: Category,
    /// Detector that produced the span
    pub source: DetectionSource,
}

impl SensitiveSpan {
    /// Create a span from a range of `input`
    ///
    /// Returns `None` if the range is empty, out of bounds, or splits a character.
    pub fn from_range(
        input: &str,
        start: usize,
        end: usize,
        category: Category,
        source: DetectionSource,
    ) -> Option<Self> {
        if start >= end || end > input.len() {
            return None;
        }
        let text = input.get(start..end)?;
        Some(Self {
            start,
            end,
            text: text.to_string(),
            category,
            source,
        })
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no text
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the two spans share at least one byte
    pub fn overlaps(&self, other: &SensitiveSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A resolved span together with the placeholder that replaced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Span that was replaced
    pub span: SensitiveSpan,
    /// Placeholder written in its place
    pub placeholder: String,
    /// Whether the placeholder was minted by this substitution
    pub created: bool,
}
