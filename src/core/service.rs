//! Anonymizer service - engine plus persistence
//!
//! This module ties the [`AnonymizationEngine`] to a [`StateManager`]: it
//! loads persisted state at startup, seeds configured domain terms and
//! saves state after each mutating operation when `save_mappings` is on.

use crate::adapters::storage::{create_state_storage, StateStorage};
use crate::anonymization::models::AnonymizationOutcome;
use crate::anonymization::report::{MappingItem, SensitivityReport};
use crate::anonymization::AnonymizationEngine;
use crate::config::VeilConfig;
use crate::core::state::{LoadSummary, StateManager};
use crate::domain::{Category, Result};
use anyhow::Context;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Anonymizer service
pub struct AnonymizerService {
    config: VeilConfig,
    engine: Arc<AnonymizationEngine>,
    state_manager: Arc<StateManager>,
    loaded: LoadSummary,
}

impl AnonymizerService {
    /// Create a service from configuration
    ///
    /// Builds the engine, opens the configured storage, restores persisted
    /// state and seeds `domain_specific_terms`.
    pub async fn new(config: VeilConfig) -> anyhow::Result<Self> {
        let engine = AnonymizationEngine::new(&config)?;
        let storage = create_state_storage(&config.storage);
        Self::with_parts(config, engine, storage).await
    }

    /// Create a service around an existing engine and storage backend
    pub async fn with_parts(
        config: VeilConfig,
        engine: AnonymizationEngine,
        storage: Arc<dyn StateStorage + Send + Sync>,
    ) -> anyhow::Result<Self> {
        let state_manager = Arc::new(
            StateManager::new_with_storage(storage)
                .with_recover_corrupt_state(config.storage.recover_corrupt_state),
        );

        let loaded = state_manager
            .load(&engine)
            .await
            .context("Failed to load anonymizer state")?;

        let service = Self {
            config,
            engine: Arc::new(engine),
            state_manager,
            loaded,
        };
        service
            .seed_domain_terms()
            .await
            .context("Failed to seed domain-specific terms")?;

        Ok(service)
    }

    async fn seed_domain_terms(&self) -> Result<()> {
        let mut added = 0;
        for (category, terms) in &self.config.domain_specific_terms {
            added += self.engine.add_domain_specific_terms(category, terms)?;
        }

        if added > 0 {
            tracing::info!(added, "Seeded domain-specific terms from configuration");
            self.persist_terms().await?;
        }
        Ok(())
    }

    /// Shared engine
    pub fn engine(&self) -> &Arc<AnonymizationEngine> {
        &self.engine
    }

    /// Configuration the service was built with
    pub fn config(&self) -> &VeilConfig {
        &self.config
    }

    /// State restored at startup
    pub fn loaded(&self) -> LoadSummary {
        self.loaded
    }

    /// Report sensitive values without registering them
    pub fn analyze_sensitivity(&self, text: &str) -> SensitivityReport {
        self.engine.analyze_sensitivity(text)
    }

    /// Anonymize text, persisting new mappings if configured
    pub async fn anonymize(&self, text: &str) -> Result<AnonymizationOutcome> {
        let outcome = self.engine.anonymize_with_report(text);
        // A dirty store also covers entries left unsaved by an earlier failure
        if self.engine.mapping_store().is_dirty() {
            self.persist_mappings().await?;
        }
        Ok(outcome)
    }

    /// Deanonymize text under the configured unknown-placeholder policy
    pub fn deanonymize(&self, text: &str) -> Result<String> {
        self.engine
            .deanonymize_with_policy(text, self.config.anonymizer.unknown_placeholder)
    }

    /// Deanonymize text, failing on unknown placeholders
    pub fn deanonymize_strict(&self, text: &str) -> Result<String> {
        self.engine.deanonymize_strict(text)
    }

    /// Register terms under a category, persisting if configured
    pub async fn add_domain_specific_terms<I, S>(&self, category: &str, terms: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.engine.add_domain_specific_terms(category, terms)?;
        if added > 0 {
            self.persist_terms().await?;
        }
        Ok(added)
    }

    /// Register one term under a category, persisting if configured
    pub async fn add_single_term(&self, category: &str, term: &str) -> Result<bool> {
        let added = self.engine.add_single_term(category, term)?;
        if added {
            self.persist_terms().await?;
        }
        Ok(added)
    }

    /// Registered terms per category
    pub fn list_terms(&self) -> BTreeMap<Category, Vec<String>> {
        self.engine.list_terms()
    }

    /// Issued placeholders per category
    pub fn placeholder_mapping(&self) -> BTreeMap<Category, Vec<MappingItem>> {
        self.engine.placeholder_mapping()
    }

    /// Save all state now, regardless of `save_mappings`
    pub async fn flush(&self) -> Result<()> {
        self.state_manager.save_all(&self.engine).await
    }

    async fn persist_mappings(&self) -> Result<()> {
        if !self.config.anonymizer.save_mappings {
            return Ok(());
        }
        self.state_manager
            .save_mappings(self.engine.mapping_store())
            .await
    }

    async fn persist_terms(&self) -> Result<()> {
        if !self.config.anonymizer.save_mappings {
            return Ok(());
        }
        self.state_manager.save_terms(&self.engine).await
    }
}
