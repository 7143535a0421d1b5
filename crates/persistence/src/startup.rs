//! Startup helpers: waiting for the database and seeding reference data.
//!
//! Neither runs inside request handling. The server binary calls
//! [`wait_until_ready`] before binding and [`seed`] once the schema exists.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::core::{Backend, RegistryStore};
use crate::error::{BackendError, StorageResult};
use crate::types::{IdentificationType, PatientRecord, RecordStatus};

/// Caller recorded on rows written by the seeder.
pub const SEED_USER: &str = "SYSTEM";

/// How often and how long to check the database before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of checks, at least one.
    pub attempts: u32,
    /// Pause between checks.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 30,
            delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Polls `backend` until it answers a health check.
///
/// Fails with the last health-check error once every attempt is used.
pub async fn wait_until_ready<B>(backend: &B, policy: RetryPolicy) -> Result<(), BackendError>
where
    B: Backend + ?Sized,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match backend.health_check().await {
            Ok(()) => {
                info!(backend = backend.name(), attempt, "Database connection established");
                return Ok(());
            }
            Err(e) if attempt < attempts => {
                warn!(
                    backend = backend.name(),
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Waiting for database to become available"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// What [`seed`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Identification types inserted.
    pub identification_types: usize,
    /// Sample patients inserted.
    pub patients: usize,
}

fn sample_patient(
    id: i64,
    type_code: &str,
    number: &str,
    names: [Option<&str>; 4],
    email: &str,
) -> PatientRecord {
    let [first_given, second_given, first_family, second_family] = names;
    let mut record = PatientRecord {
        id,
        identification_type_code: type_code.to_string(),
        identification_number: number.to_string(),
        first_given_name: first_given.unwrap_or_default().to_string(),
        second_given_name: second_given.map(str::to_string),
        first_family_name: first_family.unwrap_or_default().to_string(),
        second_family_name: second_family.map(str::to_string),
        full_name: String::new(),
        email: email.to_string(),
        status: RecordStatus::Active,
        created_at: Utc::now(),
        created_by: SEED_USER.to_string(),
        modified_at: None,
        modified_by: None,
    };
    record.refresh_full_name();
    record
}

/// Writes reference data into empty tables.
///
/// Identification types are inserted when the lookup is empty. The two
/// sample patients are inserted when `with_sample_patients` is set and no
/// patient exists yet.
pub async fn seed<S>(store: &S, with_sample_patients: bool) -> StorageResult<SeedReport>
where
    S: RegistryStore + ?Sized,
{
    let mut report = SeedReport::default();

    let existing = store.list_identification_types().await?;
    if existing.is_empty() {
        for entry in IdentificationType::defaults() {
            store.insert_identification_type(&entry).await?;
            report.identification_types += 1;
        }
        info!(count = report.identification_types, "Seeded identification types");
    } else {
        info!(count = existing.len(), "Identification types already present");
    }

    if !with_sample_patients {
        return Ok(report);
    }

    let patient_count = store.count_patients().await?;
    if patient_count > 0 {
        info!(count = patient_count, "Patients already present");
        return Ok(report);
    }

    let juan = sample_patient(
        store.next_id().await?,
        "CC",
        "1234567890",
        [Some("Juan"), Some("Carlos"), Some("Pérez"), Some("García")],
        "juan.perez@example.com",
    );
    store.insert_patient(&juan).await?;
    report.patients += 1;

    let maria = sample_patient(
        store.next_id().await?,
        "CE",
        "9876543210",
        [Some("María"), None, Some("González"), Some("López")],
        "maria.gonzalez@example.com",
    );
    store.insert_patient(&maria).await?;
    report.patients += 1;

    info!(count = report.patients, "Seeded sample patients");
    Ok(report)
}
