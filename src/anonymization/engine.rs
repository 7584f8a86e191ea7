//! Main anonymization engine
//!
//! This module provides the core [`AnonymizationEngine`] that orchestrates
//! detection, overlap resolution, placeholder substitution and audit logging.
//!
//! # Architecture
//!
//! The engine coordinates four components:
//! - **Entity detector**: model-backed spans behind a pluggable recognizer
//! - **Pattern detector**: regex rules for structured identifiers
//! - **Custom term registry**: operator-registered literal terms
//! - **Mapping store**: the reversible value/placeholder ledger
//!
//! # Examples
//!
//! ```no_run
//! use veil::anonymization::AnonymizationEngine;
//! use veil::config::VeilConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = AnonymizationEngine::new(&VeilConfig::default())?;
//! engine.add_single_term("PROJECT", "Bluebird")?;
//!
//! let anonymized = engine.anonymize("Bluebird ships to jane@x.com");
//! assert_eq!(anonymized, "[PROJECT_1] ships to [EMAIL_1]");
//! assert_eq!(engine.deanonymize(&anonymized), "Bluebird ships to jane@x.com");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    audit::AuditLogger,
    config::{AnonymizerConfig, UnknownPlaceholderPolicy},
    detector::{
        patterns::PatternRegistry, EntityDetector, EntityRecognizer, PatternDetector, SpanDetector,
    },
    mapping::{placeholder_regex, MappingSnapshot, MappingStore},
    models::{AnonymizationOutcome, SensitiveSpan, Substitution},
    report::{MappingItem, SensitivityReport},
    resolve::resolve_overlaps,
    terms::{CustomTermRegistry, TermsSnapshot},
};
use crate::config::VeilConfig;
use crate::domain::{Category, Result, VeilError};
use anyhow::Context;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// Main anonymization engine
///
/// # Thread Safety
///
/// The engine is `Send + Sync` and can be shared across tasks using `Arc`.
/// Detection is read-only; the only shared mutable state is the mapping
/// store (one mutex) and the term registry (one read/write lock).
pub struct AnonymizationEngine {
    config: AnonymizerConfig,
    entity_detector: EntityDetector,
    pattern_detector: PatternDetector,
    terms: RwLock<CustomTermRegistry>,
    store: Arc<MappingStore>,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine with an empty mapping store
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Detection or audit configuration validation fails
    /// - Pattern library file cannot be loaded
    /// - Audit log directory cannot be created
    pub fn new(config: &VeilConfig) -> anyhow::Result<Self> {
        Self::with_store(config, Arc::new(MappingStore::new()))
    }

    /// Create an engine around an existing mapping store
    pub fn with_store(config: &VeilConfig, store: Arc<MappingStore>) -> anyhow::Result<Self> {
        config
            .detection
            .validate()
            .context("Invalid detection configuration")?;
        config
            .audit
            .validate()
            .context("Invalid audit configuration")?;

        let pattern_detector = match config.detection.pattern_library {
            Some(ref pattern_path) => {
                PatternDetector::with_registry(PatternRegistry::from_file(pattern_path)?)
            }
            None => PatternDetector::new()?,
        }
        .with_confidence_threshold(config.detection.confidence_threshold);

        let entity_detector = EntityDetector::from_config(&config.detection)
            .context("Failed to initialize entity recognizer")?;

        let audit_logger = AuditLogger::from_config(&config.audit)
            .context("Failed to initialize audit logger")?;

        tracing::debug!(
            recognizer = entity_detector.recognizer_name(),
            case_sensitive_terms = config.anonymizer.case_sensitive_terms,
            audit = audit_logger.is_some(),
            "Anonymization engine created"
        );

        Ok(Self {
            config: config.anonymizer.clone(),
            entity_detector,
            pattern_detector,
            terms: RwLock::new(CustomTermRegistry::new(config.anonymizer.case_sensitive_terms)),
            store,
            audit_logger,
        })
    }

    /// Replace the entity recognizer, keeping label settings
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.entity_detector = self.entity_detector.with_recognizer(recognizer);
        self
    }

    /// Anonymizer settings this engine was built with
    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }

    /// Shared mapping store
    pub fn mapping_store(&self) -> &Arc<MappingStore> {
        &self.store
    }

    fn terms_read(&self) -> RwLockReadGuard<'_, CustomTermRegistry> {
        self.terms
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn terms_write(&self) -> RwLockWriteGuard<'_, CustomTermRegistry> {
        self.terms
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run every detector and resolve overlaps
    fn detect(&self, text: &str) -> Vec<SensitiveSpan> {
        let mut candidates = self.entity_detector.detect(text);
        candidates.extend(self.pattern_detector.detect(text));
        candidates.extend(self.terms_read().find_matches(text));

        let candidate_count = candidates.len();
        let spans = resolve_overlaps(text, candidates);
        tracing::trace!(candidates = candidate_count, spans = spans.len(), "Detection complete");
        spans
    }

    /// Report the distinct sensitive values in `text`, per category
    ///
    /// Uses the same detection and overlap resolution as
    /// [`anonymize`](Self::anonymize) but never touches the mapping store.
    pub fn analyze_sensitivity(&self, text: &str) -> SensitivityReport {
        let mut report = SensitivityReport::new();
        for span in self.detect(text) {
            report.record(&span.category, &span.text);
        }
        report
    }

    /// Replace every sensitive span with its placeholder
    ///
    /// New values are registered in the mapping store; values seen before
    /// reuse their existing placeholder.
    pub fn anonymize(&self, text: &str) -> String {
        self.anonymize_with_report(text).anonymized_text
    }

    /// Anonymize and return the sensitivity report alongside the text
    pub fn anonymize_with_report(&self, text: &str) -> AnonymizationOutcome {
        let start = Instant::now();
        let spans = self.detect(text);

        let mut report = SensitivityReport::new();
        let substitutions: Vec<Substitution> = spans
            .into_iter()
            .map(|span| {
                report.record(&span.category, &span.text);
                let (placeholder, created) = self.store.assign(&span.text, &span.category);
                Substitution {
                    span,
                    placeholder,
                    created,
                }
            })
            .collect();

        let mut anonymized = text.to_string();
        for substitution in substitutions.iter().rev() {
            anonymized.replace_range(
                substitution.span.start..substitution.span.end,
                &substitution.placeholder,
            );
        }

        let processing_time = start.elapsed().as_millis() as u64;
        let new_placeholders = substitutions.iter().filter(|s| s.created).count();

        if let Some(ref logger) = self.audit_logger {
            if let Err(e) = logger.log_anonymization(&substitutions, processing_time) {
                tracing::warn!(error = %e, "Failed to write audit entry");
            }
        }

        tracing::debug!(
            replacements = substitutions.len(),
            new_placeholders,
            categories = report.len(),
            "Text anonymized"
        );

        AnonymizationOutcome::new(
            anonymized,
            report,
            substitutions.len(),
            new_placeholders,
            processing_time,
        )
    }

    /// Restore original values, leaving unknown placeholder tokens verbatim
    pub fn deanonymize(&self, text: &str) -> String {
        match self.restore_placeholders(text, UnknownPlaceholderPolicy::Leave) {
            Ok(restored) => restored,
            Err(e) => {
                tracing::warn!(error = %e, "Deanonymization failed, returning text unchanged");
                text.to_string()
            }
        }
    }

    /// Restore original values, failing on the first unknown placeholder
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::UnknownPlaceholder`] naming the first token this
    /// engine's store never issued.
    pub fn deanonymize_strict(&self, text: &str) -> Result<String> {
        self.deanonymize_with_policy(text, UnknownPlaceholderPolicy::Error)
    }

    /// Restore original values under an explicit unknown-placeholder policy
    pub fn deanonymize_with_policy(
        &self,
        text: &str,
        policy: UnknownPlaceholderPolicy,
    ) -> Result<String> {
        self.restore_placeholders(text, policy)
    }

    fn restore_placeholders(
        &self,
        text: &str,
        policy: UnknownPlaceholderPolicy,
    ) -> Result<String> {
        let start = Instant::now();
        let mut restored = String::with_capacity(text.len());
        let mut last = 0;
        let mut resolved = 0;
        let mut unresolved = 0;

        for token in placeholder_regex().find_iter(text) {
            restored.push_str(&text[last..token.start()]);
            match self.store.resolve(token.as_str()) {
                Ok(original) => {
                    restored.push_str(&original);
                    resolved += 1;
                }
                Err(e) => {
                    tracing::debug!(placeholder = token.as_str(), "Unknown placeholder");
                    if policy == UnknownPlaceholderPolicy::Error {
                        return Err(e);
                    }
                    restored.push_str(token.as_str());
                    unresolved += 1;
                }
            }
            last = token.end();
        }
        restored.push_str(&text[last..]);

        if let Some(ref logger) = self.audit_logger {
            let processing_time = start.elapsed().as_millis() as u64;
            if let Err(e) = logger.log_deanonymization(resolved, unresolved, processing_time) {
                tracing::warn!(error = %e, "Failed to write audit entry");
            }
        }

        tracing::debug!(resolved, unresolved, "Text deanonymized");
        Ok(restored)
    }

    /// Register literal terms under a category
    ///
    /// Returns the number of terms that were new for the category.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::InvalidCategory`] if the category name is blank.
    pub fn add_domain_specific_terms<I, S>(&self, category: &str, terms: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let category = Category::new(category).map_err(VeilError::InvalidCategory)?;
        let added = self.terms_write().add_terms(&category, terms)?;
        if added > 0 {
            tracing::info!(category = %category, added, "Domain-specific terms added");
        }
        Ok(added)
    }

    /// Register one literal term under a category
    ///
    /// Returns `true` if the term was new for the category.
    pub fn add_single_term(&self, category: &str, term: &str) -> Result<bool> {
        let category = Category::new(category).map_err(VeilError::InvalidCategory)?;
        let added = self.terms_write().add_single_term(&category, term)?;
        if added {
            tracing::info!(category = %category, "Custom term added");
        }
        Ok(added)
    }

    /// Registered terms per category
    pub fn list_terms(&self) -> BTreeMap<Category, Vec<String>> {
        self.terms_read().list_terms()
    }

    /// Issued placeholders grouped by the category they were registered under
    pub fn placeholder_mapping(&self) -> BTreeMap<Category, Vec<MappingItem>> {
        let mut mapping: BTreeMap<Category, Vec<MappingItem>> = BTreeMap::new();
        for entry in self.store.entries() {
            mapping.entry(entry.category).or_default().push(MappingItem {
                original_value: entry.original,
                placeholder: entry.placeholder,
            });
        }
        mapping
    }

    /// Snapshot of the term registry
    pub fn terms_snapshot(&self) -> TermsSnapshot {
        self.terms_read().snapshot()
    }

    /// Replace the term registry with a snapshot
    pub fn restore_terms(&self, snapshot: TermsSnapshot) -> Result<()> {
        self.terms_write().restore(snapshot)
    }

    /// Snapshot of the mapping store
    pub fn mappings_snapshot(&self) -> MappingSnapshot {
        self.store.snapshot()
    }

    /// Replace the mapping store contents with a snapshot
    pub fn restore_mappings(&self, snapshot: MappingSnapshot) -> Result<()> {
        self.store.restore(snapshot)
    }
}
