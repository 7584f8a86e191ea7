//! Anonymization module for Veil
//!
//! This module provides sensitive-span detection and reversible,
//! placeholder-based anonymization of free text.
//!
//! # Architecture
//!
//! The anonymization pipeline consists of:
//! - **Detection**: entity model, regex patterns and custom terms each
//!   produce candidate spans
//! - **Resolution**: overlapping candidates are reduced by priority
//!   (custom term > pattern > entity), then length
//! - **Substitution**: each span is replaced by its placeholder from the
//!   mapping store
//! - **Audit**: optional append-only log with hashed values
//!
//! # Usage
//!
//! ```rust,ignore
//! use veil::anonymization::AnonymizationEngine;
//! use veil::config::VeilConfig;
//!
//! let engine = AnonymizationEngine::new(&VeilConfig::default())?;
//! let anonymized = engine.anonymize("Contact jane@x.com");
//! assert_eq!(engine.deanonymize(&anonymized), "Contact jane@x.com");
//! ```

pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod mapping;
pub mod models;
pub mod report;
pub mod resolve;
pub mod terms;

// Re-export main types
pub use config::{AnonymizerConfig, UnknownPlaceholderPolicy};
pub use engine::AnonymizationEngine;
pub use mapping::{MappingStore, PlaceholderEntry};
pub use models::{AnonymizationOutcome, DetectionSource, SensitiveSpan};
pub use report::{MappingItem, SensitivityReport};
pub use terms::CustomTermRegistry;
