//! Concurrent writes against a file-backed database.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::StatusCode;
use registry_persistence::backends::sqlite::SqliteBackend;
use registry_persistence::registry::PatientRegistry;
use registry_persistence::startup::seed;
use registry_persistence::types::NewPatient;
use registry_rest::ServerConfig;
use serde_json::Value;

use common::fixtures;
use common::harness::RestTestHarness;

fn new_patient(number: &str) -> NewPatient {
    NewPatient {
        identification_type_code: Some("CC".to_string()),
        identification_number: Some(number.to_string()),
        first_given_name: Some("Juan".to_string()),
        first_family_name: Some("Pérez".to_string()),
        email: Some("juan@example.com".to_string()),
        ..Default::default()
    }
}

async fn file_registry(dir: &tempfile::TempDir) -> PatientRegistry<SqliteBackend> {
    let backend = SqliteBackend::open(dir.path().join("registry.db")).unwrap();
    backend.init_schema().unwrap();
    seed(&backend, false).await.unwrap();
    PatientRegistry::new(Arc::new(backend))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_number_exactly_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let registry = file_registry(&dir).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry.create(new_patient("555"), "VERIS").await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) if e.is_conflict() => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_numbers_get_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let registry = file_registry(&dir).await;

    let mut handles = Vec::new();
    for n in 0..20 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry
                .create(new_patient(&format!("C{:02}", n)), "VERIS")
                .await
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let patient = handle.await.unwrap().unwrap();
        assert!(ids.insert(patient.id()));
    }
    assert_eq!(ids.len(), 20);
    assert_eq!(ids.iter().max(), Some(&20));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_http_over_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let backend = SqliteBackend::open(dir.path().join("registry.db")).unwrap();
    let harness = RestTestHarness::with_backend(backend, ServerConfig::for_testing()).await;

    let id = harness.create_ok(&fixtures::juan("111")).await;
    harness
        .create(&fixtures::juan("111"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let body: Value = harness.get(&format!("/pacientes/{}", id)).await.json();
    assert_eq!(body["data"]["nombreCompleto"], "Juan Pérez");
}
