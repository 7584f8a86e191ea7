//! Data models shared across the anonymization pipeline

pub mod outcome;
pub mod span;

pub use outcome::AnonymizationOutcome;
pub use span::{DetectionSource, SensitiveSpan, Substitution};
