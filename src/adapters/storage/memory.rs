//! In-memory state storage for tests and ephemeral runs

use super::traits::StateStorage;
use crate::anonymization::mapping::MappingSnapshot;
use crate::anonymization::terms::TermsSnapshot;
use crate::domain::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// State storage that keeps snapshots in process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    mappings: RwLock<Option<MappingSnapshot>>,
    terms: RwLock<Option<TermsSnapshot>>,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn load_mappings(&self) -> Result<Option<MappingSnapshot>> {
        Ok(self.mappings.read().await.clone())
    }

    async fn save_mappings(&self, snapshot: &MappingSnapshot) -> Result<()> {
        *self.mappings.write().await = Some(snapshot.clone());
        Ok(())
    }

    async fn load_terms(&self) -> Result<Option<TermsSnapshot>> {
        Ok(self.terms.read().await.clone())
    }

    async fn save_terms(&self, snapshot: &TermsSnapshot) -> Result<()> {
        *self.terms.write().await = Some(snapshot.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
