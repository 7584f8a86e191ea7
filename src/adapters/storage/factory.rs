//! State storage factory
//!
//! This module provides a factory function to create the state storage
//! backend selected in configuration.

use super::file::JsonFileStorage;
use super::memory::MemoryStorage;
use super::traits::StateStorage;
use crate::config::schema::{StorageBackend, StorageConfig};
use std::sync::Arc;

/// Create the state storage backend described by `config`
pub fn create_state_storage(config: &StorageConfig) -> Arc<dyn StateStorage + Send + Sync> {
    match config.backend {
        StorageBackend::File => {
            tracing::info!(path = %config.path.display(), "Using file state storage");
            Arc::new(JsonFileStorage::new(config.path.clone()))
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory state storage");
            Arc::new(MemoryStorage::new())
        }
    }
}
