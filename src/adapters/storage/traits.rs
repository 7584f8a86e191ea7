//! State storage abstraction
//!
//! This module defines the trait that persistence backends implement to
//! hold the mapping store and term registry between runs.

use crate::anonymization::mapping::MappingSnapshot;
use crate::anonymization::terms::TermsSnapshot;
use crate::domain::Result;
use async_trait::async_trait;

/// State storage trait for anonymizer persistence
///
/// Snapshots are full-state dumps, so saving is idempotent and the last
/// write always wins.
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Load the mapping snapshot
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::StoreCorrupt`](crate::domain::VeilError::StoreCorrupt)
    /// if stored state exists but cannot be decoded.
    async fn load_mappings(&self) -> Result<Option<MappingSnapshot>>;

    /// Save the mapping snapshot, replacing any previous one
    async fn save_mappings(&self, snapshot: &MappingSnapshot) -> Result<()>;

    /// Load the term registry snapshot
    async fn load_terms(&self) -> Result<Option<TermsSnapshot>>;

    /// Save the term registry snapshot, replacing any previous one
    async fn save_terms(&self, snapshot: &TermsSnapshot) -> Result<()>;

    /// Short description of the backend for logging
    fn describe(&self) -> String;
}
