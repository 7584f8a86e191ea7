//! Integration tests for mapping and term persistence
//!
//! Each test points a service at a temporary state directory, drops it and
//! opens a new one on the same directory to simulate a restart.

use std::sync::Arc;
use tempfile::TempDir;
use veil::adapters::storage::{JsonFileStorage, StateStorage};
use veil::anonymization::AnonymizationEngine;
use veil::config::{EntityModel, StorageBackend, VeilConfig};
use veil::core::AnonymizerService;
use veil::domain::VeilError;

fn create_test_config(state_dir: &TempDir) -> VeilConfig {
    let mut config = VeilConfig::default();
    config.detection.entity_model = EntityModel::None;
    config.storage.backend = StorageBackend::File;
    config.storage.path = state_dir.path().to_path_buf();
    config
}

async fn open_service(config: &VeilConfig) -> anyhow::Result<AnonymizerService> {
    AnonymizerService::new(config.clone()).await
}

#[tokio::test]
async fn test_mappings_survive_restart() {
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&state_dir);

    let first = open_service(&config).await.expect("Failed to open service");
    let outcome = first
        .anonymize("write to jane@x.com")
        .await
        .expect("Anonymize failed");
    assert_eq!(outcome.anonymized_text, "write to [EMAIL_1]");
    drop(first);

    let second = open_service(&config).await.expect("Failed to reopen service");
    assert_eq!(second.loaded().mappings, 1);
    assert_eq!(
        second.deanonymize("reply sent to [EMAIL_1]").expect("Deanonymize failed"),
        "reply sent to jane@x.com"
    );

    let outcome = second
        .anonymize("cc jane@x.com and bob@y.org")
        .await
        .expect("Anonymize failed");
    assert_eq!(outcome.anonymized_text, "cc [EMAIL_1] and [EMAIL_2]");
}

#[tokio::test]
async fn test_terms_survive_restart() {
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&state_dir);

    let first = open_service(&config).await.expect("Failed to open service");
    let added = first
        .add_domain_specific_terms("PROJECT", ["Bluebird", "Nightjar"])
        .await
        .expect("Failed to add terms");
    assert_eq!(added, 2);
    drop(first);

    let second = open_service(&config).await.expect("Failed to reopen service");
    assert_eq!(second.loaded().terms, 2);
    let outcome = second
        .anonymize("Nightjar follows Bluebird")
        .await
        .expect("Anonymize failed");
    assert_eq!(outcome.anonymized_text, "[PROJECT_1] follows [PROJECT_2]");
}

#[tokio::test]
async fn test_shared_term_keeps_owner_across_restart() {
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&state_dir);

    let first = open_service(&config).await.expect("Failed to open service");
    first
        .add_single_term("PROJECT", "Orion")
        .await
        .expect("Failed to add term");
    first
        .add_single_term("ORG", "Orion")
        .await
        .expect("Failed to add term");
    let before = first.analyze_sensitivity("Orion ships Friday");
    assert_eq!(before.get("PROJECT"), Some(&["Orion".to_string()][..]));
    drop(first);

    let second = open_service(&config).await.expect("Failed to reopen service");
    let after = second.analyze_sensitivity("Orion ships Friday");
    assert_eq!(after.get("PROJECT"), Some(&["Orion".to_string()][..]));
    assert!(after.get("ORG").is_none());

    let outcome = second
        .anonymize("Orion ships Friday")
        .await
        .expect("Anonymize failed");
    assert_eq!(outcome.anonymized_text, "[PROJECT_1] ships Friday");
}

#[tokio::test]
async fn test_counters_never_reuse_numbers() {
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&state_dir);

    let service = open_service(&config).await.expect("Failed to open service");
    service
        .anonymize("a@x.com b@x.com c@x.com")
        .await
        .expect("Anonymize failed");
    drop(service);

    let reopened = open_service(&config).await.expect("Failed to reopen service");
    assert_eq!(reopened.engine().mapping_store().high_water_mark("EMAIL"), 3);

    let outcome = reopened
        .anonymize("d@x.com")
        .await
        .expect("Anonymize failed");
    assert_eq!(outcome.anonymized_text, "[EMAIL_4]");
}

#[tokio::test]
async fn test_save_mappings_disabled_keeps_state_in_memory() {
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&state_dir);
    config.anonymizer.save_mappings = false;

    let service = open_service(&config).await.expect("Failed to open service");
    service
        .anonymize("write to jane@x.com")
        .await
        .expect("Anonymize failed");

    let storage = JsonFileStorage::new(state_dir.path());
    assert!(!storage.mappings_path().exists());

    service.flush().await.expect("Flush failed");
    let snapshot = storage
        .load_mappings()
        .await
        .expect("Load failed")
        .expect("Snapshot missing after flush");
    assert_eq!(snapshot.entries.len(), 1);
}

#[tokio::test]
async fn test_corrupt_mappings_fail_startup() {
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&state_dir);
    let storage = JsonFileStorage::new(state_dir.path());
    std::fs::write(storage.mappings_path(), "{ not json").expect("Failed to write file");

    let result = open_service(&config).await;

    let err = result.err().expect("Corrupt state should fail startup");
    assert!(matches!(
        err.downcast_ref::<VeilError>(),
        Some(VeilError::StoreCorrupt(_))
    ));
}

#[tokio::test]
async fn test_corrupt_mappings_recovered_when_enabled() {
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&state_dir);
    config.storage.recover_corrupt_state = true;
    let storage = JsonFileStorage::new(state_dir.path());
    std::fs::write(storage.mappings_path(), "{ not json").expect("Failed to write file");

    let service = open_service(&config).await.expect("Recovery should succeed");

    assert!(service.loaded().recovered);
    assert_eq!(service.loaded().mappings, 0);
    let outcome = service
        .anonymize("write to jane@x.com")
        .await
        .expect("Anonymize failed");
    assert_eq!(outcome.anonymized_text, "write to [EMAIL_1]");
}

#[tokio::test]
async fn test_duplicate_placeholder_in_snapshot_is_corrupt() {
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&state_dir);
    let storage = JsonFileStorage::new(state_dir.path());
    let document = r#"{
        "version": 1,
        "entries": [
            { "original": "a@x.com", "placeholder": "[EMAIL_1]", "category": "EMAIL" },
            { "original": "b@x.com", "placeholder": "[EMAIL_1]", "category": "EMAIL" }
        ],
        "counters": { "EMAIL": 1 },
        "saved_at": "2025-01-01T00:00:00Z"
    }"#;
    std::fs::write(storage.mappings_path(), document).expect("Failed to write file");

    let engine = AnonymizationEngine::new(&config).expect("Failed to create engine");
    let result = AnonymizerService::with_parts(config, engine, Arc::new(storage)).await;

    assert!(result.is_err());
}
