//! State manager for anonymizer persistence
//!
//! This module provides the StateManager for loading and saving the mapping
//! store and term registry through a [`StateStorage`] backend.

use crate::adapters::storage::StateStorage;
use crate::anonymization::mapping::MappingStore;
use crate::anonymization::AnonymizationEngine;
use crate::domain::{Result, VeilError};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What a [`StateManager::load`] call restored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Mapping entries restored
    pub mappings: usize,
    /// Custom terms restored
    pub terms: usize,
    /// Whether corrupt state was discarded
    pub recovered: bool,
}

/// State manager for anonymizer persistence
///
/// Writes are serialized: the write lock is held for the whole duration of
/// each save, so two snapshots never interleave on the storage medium.
pub struct StateManager {
    /// State storage backend
    storage: Arc<dyn StateStorage + Send + Sync>,
    write_lock: Mutex<()>,
    recover_corrupt_state: bool,
}

impl StateManager {
    /// Create a new StateManager with a state storage backend
    pub fn new_with_storage(storage: Arc<dyn StateStorage + Send + Sync>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
            recover_corrupt_state: false,
        }
    }

    /// Start from empty state instead of failing when stored state is corrupt
    pub fn with_recover_corrupt_state(mut self, recover: bool) -> Self {
        self.recover_corrupt_state = recover;
        self
    }

    /// Storage backend description
    pub fn describe(&self) -> String {
        self.storage.describe()
    }

    /// Load persisted mappings and terms into an engine
    ///
    /// Missing state is not an error: a first run starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::StoreCorrupt`] if stored state cannot be decoded
    /// or validated and recovery is disabled.
    pub async fn load(&self, engine: &AnonymizationEngine) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();

        let mappings = self
            .storage
            .load_mappings()
            .await
            .and_then(|snapshot| match snapshot {
                Some(snapshot) => engine.restore_mappings(snapshot),
                None => Ok(()),
            });
        summary.recovered |= self.recover("mappings", mappings)?;
        summary.mappings = engine.mapping_store().len();

        let terms = self
            .storage
            .load_terms()
            .await
            .and_then(|snapshot| match snapshot {
                Some(snapshot) => engine.restore_terms(snapshot),
                None => Ok(()),
            });
        summary.recovered |= self.recover("terms", terms)?;
        summary.terms = engine.list_terms().values().map(Vec::len).sum();

        tracing::info!(
            storage = %self.storage.describe(),
            mappings = summary.mappings,
            terms = summary.terms,
            "Anonymizer state loaded"
        );

        Ok(summary)
    }

    /// Apply the corrupt-state policy to a load result
    fn recover(&self, what: &str, result: Result<()>) -> Result<bool> {
        match result {
            Ok(()) => Ok(false),
            Err(VeilError::StoreCorrupt(reason)) if self.recover_corrupt_state => {
                tracing::warn!(
                    state = what,
                    reason = %reason,
                    "Stored state is corrupt, starting empty"
                );
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// Save the mapping store
    ///
    /// The dirty flag is cleared as part of the snapshot and set again if
    /// the write fails.
    pub async fn save_mappings(&self, store: &MappingStore) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let snapshot = store.checkpoint();
        if let Err(e) = self.storage.save_mappings(&snapshot).await {
            store.mark_dirty();
            return Err(e);
        }
        Ok(())
    }

    /// Save the term registry
    pub async fn save_terms(&self, engine: &AnonymizationEngine) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.storage.save_terms(&engine.terms_snapshot()).await
    }

    /// Save mappings and terms
    pub async fn save_all(&self, engine: &AnonymizationEngine) -> Result<()> {
        self.save_mappings(engine.mapping_store()).await?;
        self.save_terms(engine).await?;
        tracing::debug!(storage = %self.storage.describe(), "Anonymizer state saved");
        Ok(())
    }
}
