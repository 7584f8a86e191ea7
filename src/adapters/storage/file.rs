//! JSON file state storage
//!
//! Keeps two documents in one directory: `mappings.json` and `terms.json`.
//! Each save writes a temporary file next to the target and renames it into
//! place, so a crash mid-write never leaves a truncated document behind.

use super::traits::StateStorage;
use crate::anonymization::mapping::MappingSnapshot;
use crate::anonymization::terms::TermsSnapshot;
use crate::domain::{Result, VeilError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const MAPPINGS_FILE: &str = "mappings.json";
const TERMS_FILE: &str = "terms.json";

/// State storage backed by JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage rooted at `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the state documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the mapping document
    pub fn mappings_path(&self) -> PathBuf {
        self.dir.join(MAPPINGS_FILE)
    }

    /// Path of the terms document
    pub fn terms_path(&self) -> PathBuf {
        self.dir.join(TERMS_FILE)
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(VeilError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content).map(Some).map_err(|e| {
            VeilError::StoreCorrupt(format!("{} is not valid state: {}", path.display(), e))
        })
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            VeilError::Storage(format!(
                "Failed to create state directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let json = serde_json::to_vec_pretty(value)?;
        let tmp_path = path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, &json).await.map_err(|e| {
            VeilError::Storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, path).await.map_err(|e| {
            VeilError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl StateStorage for JsonFileStorage {
    async fn load_mappings(&self) -> Result<Option<MappingSnapshot>> {
        Self::read_json(&self.mappings_path()).await
    }

    async fn save_mappings(&self, snapshot: &MappingSnapshot) -> Result<()> {
        self.write_json(&self.mappings_path(), snapshot).await?;
        tracing::debug!(
            path = %self.mappings_path().display(),
            entries = snapshot.entries.len(),
            "Mappings saved"
        );
        Ok(())
    }

    async fn load_terms(&self) -> Result<Option<TermsSnapshot>> {
        Self::read_json(&self.terms_path()).await
    }

    async fn save_terms(&self, snapshot: &TermsSnapshot) -> Result<()> {
        self.write_json(&self.terms_path(), snapshot).await?;
        tracing::debug!(path = %self.terms_path().display(), "Terms saved");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::mapping::MappingStore;
    use crate::anonymization::terms::CustomTermRegistry;
    use crate::domain::Category;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("state"));
        assert!(storage.load_mappings().await.unwrap().is_none());
        assert!(storage.load_terms().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load_mappings() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("state"));

        let store = MappingStore::new();
        store.get_or_create_placeholder("Jane Doe", &Category::new("PERSON").unwrap());
        storage.save_mappings(&store.snapshot()).await.unwrap();

        assert!(storage.mappings_path().exists());
        assert!(!storage.mappings_path().with_extension("json.tmp").exists());

        let loaded = storage.load_mappings().await.unwrap().unwrap();
        assert_eq!(loaded.entries, store.entries());
    }

    #[tokio::test]
    async fn test_save_and_load_terms() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());

        let mut registry = CustomTermRegistry::new(false);
        registry
            .add_terms(&Category::new("ORG").unwrap(), ["Acme Corp"])
            .unwrap();
        storage.save_terms(&registry.snapshot()).await.unwrap();

        let loaded = storage.load_terms().await.unwrap().unwrap();
        assert_eq!(loaded.terms, registry.list_terms());
    }

    #[tokio::test]
    async fn test_garbage_file_is_store_corrupt() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        std::fs::write(storage.mappings_path(), "{ not json").unwrap();

        assert!(matches!(
            storage.load_mappings().await,
            Err(VeilError::StoreCorrupt(_))
        ));
    }
}
