//! PatientStorage and IdentificationTypeStorage implementations for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior, params};

use crate::core::{IdentificationTypeStorage, PatientMutation, PatientStorage};
use crate::error::{BackendError, StorageError, StorageResult, ValidationError};
use crate::types::{
    IdentificationType, Page, PageRequest, Patient, PatientFilter, PatientRecord, RecordStatus,
};

use super::SqliteBackend;
use super::query_builder::{PATIENT_COLUMNS, PATIENT_FROM, PatientQueryBuilder};

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

fn query_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::QueryError { message })
}

fn conversion_error(
    idx: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn parse_status(idx: usize, raw: &str) -> rusqlite::Result<RecordStatus> {
    raw.parse::<RecordStatus>()
        .map_err(|e| conversion_error(idx, e))
}

/// Maps a row selected with [`PATIENT_COLUMNS`].
fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    let status: String = row.get(9)?;
    let created_at: String = row.get(10)?;
    let modified_at: Option<String> = row.get(12)?;
    let type_status: String = row.get(16)?;

    let record = PatientRecord {
        id: row.get(0)?,
        identification_type_code: row.get(1)?,
        identification_number: row.get(2)?,
        first_given_name: row.get(3)?,
        second_given_name: row.get(4)?,
        first_family_name: row.get(5)?,
        second_family_name: row.get(6)?,
        full_name: row.get(7)?,
        email: row.get(8)?,
        status: parse_status(9, &status)?,
        created_at: parse_timestamp(10, &created_at)?,
        created_by: row.get(11)?,
        modified_at: modified_at
            .as_deref()
            .map(|raw| parse_timestamp(12, raw))
            .transpose()?,
        modified_by: row.get(13)?,
    };

    Ok(Patient {
        record,
        identification_type: IdentificationType {
            code: row.get(14)?,
            name: row.get(15)?,
            status: parse_status(16, &type_status)?,
        },
    })
}

/// Translates constraint violations into domain errors.
fn map_write_error(e: rusqlite::Error, record: &PatientRecord) -> StorageError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = e {
        if failure.code == ErrorCode::ConstraintViolation {
            match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    return StorageError::duplicate_identification_number(
                        &record.identification_number,
                    );
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return ValidationError::UnknownIdentificationType {
                        code: record.identification_type_code.clone(),
                    }
                    .into();
                }
                _ => {}
            }
        }
    }
    internal_error(format!("Failed to write patient {}: {}", record.id, e))
}

fn load_patient(conn: &Connection, id: i64) -> StorageResult<Option<Patient>> {
    let sql = format!("SELECT {} FROM {} WHERE p.id = ?1", PATIENT_COLUMNS, PATIENT_FROM);
    conn.query_row(&sql, [id], patient_from_row)
        .optional()
        .map_err(|e| query_error(format!("Failed to read patient {}: {}", id, e)))
}

fn write_patient(conn: &Connection, record: &PatientRecord) -> StorageResult<()> {
    conn.execute(
        "UPDATE patients SET
            first_given_name = ?2,
            second_given_name = ?3,
            first_family_name = ?4,
            second_family_name = ?5,
            full_name = ?6,
            email = ?7,
            status = ?8,
            modified_at = ?9,
            modified_by = ?10
         WHERE id = ?1",
        params![
            record.id,
            record.first_given_name,
            record.second_given_name,
            record.first_family_name,
            record.second_family_name,
            record.full_name,
            record.email,
            record.status.as_code(),
            record.modified_at.map(|at| at.to_rfc3339()),
            record.modified_by,
        ],
    )
    .map_err(|e| map_write_error(e, record))?;
    Ok(())
}

#[async_trait]
impl IdentificationTypeStorage for SqliteBackend {
    async fn find_identification_type(
        &self,
        code: &str,
    ) -> StorageResult<Option<IdentificationType>> {
        let conn = self.get_connection()?;
        conn.query_row(
            "SELECT code, name, status FROM identification_types WHERE code = ?1",
            [code],
            |row| {
                let status: String = row.get(2)?;
                Ok(IdentificationType {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    status: parse_status(2, &status)?,
                })
            },
        )
        .optional()
        .map_err(|e| query_error(format!("Failed to read identification type: {}", e)))
    }

    async fn list_identification_types(&self) -> StorageResult<Vec<IdentificationType>> {
        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT code, name, status FROM identification_types ORDER BY code")
            .map_err(|e| internal_error(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                let status: String = row.get(2)?;
                Ok(IdentificationType {
                    code: row.get(0)?,
                    name: row.get(1)?,
                    status: parse_status(2, &status)?,
                })
            })
            .map_err(|e| query_error(format!("Failed to list identification types: {}", e)))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| internal_error(format!("Failed to read row: {}", e)))
    }

    async fn insert_identification_type(&self, entry: &IdentificationType) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT OR IGNORE INTO identification_types (code, name, status) VALUES (?1, ?2, ?3)",
            params![entry.code, entry.name, entry.status.as_code()],
        )
        .map_err(|e| internal_error(format!("Failed to insert identification type: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl PatientStorage for SqliteBackend {
    async fn identification_number_exists(&self, number: &str) -> StorageResult<bool> {
        let conn = self.get_connection()?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE identification_number = ?1)",
            [number],
            |row| row.get(0),
        )
        .map_err(|e| query_error(format!("Failed to check identification number: {}", e)))
    }

    async fn insert_patient(&self, record: &PatientRecord) -> StorageResult<Patient> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO patients (
                id, identification_type_code, identification_number,
                first_given_name, second_given_name, first_family_name, second_family_name,
                full_name, email, status, created_at, created_by, modified_at, modified_by
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                record.id,
                record.identification_type_code,
                record.identification_number,
                record.first_given_name,
                record.second_given_name,
                record.first_family_name,
                record.second_family_name,
                record.full_name,
                record.email,
                record.status.as_code(),
                record.created_at.to_rfc3339(),
                record.created_by,
                record.modified_at.map(|at| at.to_rfc3339()),
                record.modified_by,
            ],
        )
        .map_err(|e| map_write_error(e, record))?;

        tracing::debug!(id = record.id, "Inserted patient");

        load_patient(&conn, record.id)?
            .ok_or_else(|| internal_error(format!("Patient {} vanished after insert", record.id)))
    }

    async fn find_patient(&self, id: i64) -> StorageResult<Option<Patient>> {
        let conn = self.get_connection()?;
        load_patient(&conn, id)
    }

    async fn update_patient_with(
        &self,
        id: i64,
        mutation: PatientMutation,
    ) -> StorageResult<Patient> {
        let mut conn = self.get_connection()?;
        // Immediate so concurrent writers queue on the busy timeout instead of
        // failing when upgrading a read lock.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        let mut record = load_patient(&tx, id)?
            .ok_or_else(|| StorageError::patient_not_found(id))?
            .record;

        // Dropping the transaction on error rolls it back.
        mutation(&mut record)?;
        write_patient(&tx, &record)?;
        let patient = load_patient(&tx, id)?
            .ok_or_else(|| StorageError::patient_not_found(id))?;

        tx.commit()
            .map_err(|e| internal_error(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(id, status = %patient.status(), "Updated patient");
        Ok(patient)
    }

    async fn list_patients(
        &self,
        filter: &PatientFilter,
        page: PageRequest,
    ) -> StorageResult<Page<Patient>> {
        let conn = self.get_connection()?;
        let builder = PatientQueryBuilder::new(filter);

        let count = builder.build_count();
        let total: i64 = conn
            .query_row(&count.sql, count.param_refs().as_slice(), |row| row.get(0))
            .map_err(|e| query_error(format!("Failed to count patients: {}", e)))?;

        let fetch = builder.build_page(page);
        let mut stmt = conn
            .prepare(&fetch.sql)
            .map_err(|e| internal_error(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(fetch.param_refs().as_slice(), patient_from_row)
            .map_err(|e| query_error(format!("Failed to list patients: {}", e)))?;
        let items = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;

        Ok(Page::new(items, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn count_patients(&self) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .map_err(|e| query_error(format!("Failed to count patients: {}", e)))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldUpdate;

    fn backend() -> SqliteBackend {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();
        backend
    }

    async fn seed_types(backend: &SqliteBackend) {
        for entry in IdentificationType::defaults() {
            backend.insert_identification_type(&entry).await.unwrap();
        }
    }

    fn record(id: i64, number: &str, first: &str, last: &str) -> PatientRecord {
        let mut record = PatientRecord {
            id,
            identification_type_code: "CC".to_string(),
            identification_number: number.to_string(),
            first_given_name: first.to_string(),
            second_given_name: None,
            first_family_name: last.to_string(),
            second_family_name: None,
            full_name: String::new(),
            email: format!("{}@example.com", first.to_lowercase()),
            status: RecordStatus::Active,
            created_at: Utc::now(),
            created_by: "VERIS".to_string(),
            modified_at: None,
            modified_by: None,
        };
        record.refresh_full_name();
        record
    }

    #[tokio::test]
    async fn test_insert_and_find_joined() {
        let backend = backend();
        seed_types(&backend).await;

        let stored = backend
            .insert_patient(&record(1, "111", "Juan", "Pérez"))
            .await
            .unwrap();
        assert_eq!(stored.record.full_name, "Juan Pérez");
        assert_eq!(stored.identification_type.name, "Cédula de Ciudadanía");

        let found = backend.find_patient(1).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(backend.find_patient(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_number_is_conflict() {
        let backend = backend();
        seed_types(&backend).await;

        backend
            .insert_patient(&record(1, "111", "Juan", "Pérez"))
            .await
            .unwrap();
        let err = backend
            .insert_patient(&record(2, "111", "Ana", "Ruiz"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(backend.identification_number_exists("111").await.unwrap());
        assert!(!backend.identification_number_exists("222").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_type_is_rejected_by_foreign_key() {
        let backend = backend();
        let err = backend
            .insert_patient(&record(1, "111", "Juan", "Pérez"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Validation(ValidationError::UnknownIdentificationType { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_mutation_rolls_back() {
        let backend = backend();
        seed_types(&backend).await;
        backend
            .insert_patient(&record(1, "111", "Juan", "Pérez"))
            .await
            .unwrap();

        let err = backend
            .update_patient_with(
                1,
                Box::new(|record| {
                    record.first_given_name = "Changed".to_string();
                    Err(ValidationError::InvalidEmail {
                        email: "x".to_string(),
                    }
                    .into())
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));

        let found = backend.find_patient(1).await.unwrap().unwrap();
        assert_eq!(found.record.first_given_name, "Juan");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let backend = backend();
        let err = backend
            .update_patient_with(9, Box::new(|_| Ok(())))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let backend = backend();
        seed_types(&backend).await;
        backend
            .insert_patient(&record(1, "111", "Juan", "Pérez"))
            .await
            .unwrap();

        let updated = backend
            .update_patient_with(
                1,
                Box::new(|record| {
                    FieldUpdate::Set("Gómez".to_string())
                        .apply_optional(&mut record.second_family_name);
                    record.refresh_full_name();
                    record.stamp_modified("VERIS", Utc::now());
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.record.full_name, "Juan Pérez Gómez");
        assert_eq!(updated.record.modified_by.as_deref(), Some("VERIS"));
        assert!(updated.record.modified_at.is_some());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_counts() {
        let backend = backend();
        seed_types(&backend).await;
        for id in 1..=3 {
            backend
                .insert_patient(&record(id, &format!("10{}", id), "Ana", "Ruiz"))
                .await
                .unwrap();
        }

        let page = backend
            .list_patients(&PatientFilter::default(), PageRequest::new(1, 2))
            .await
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(Patient::id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(page.info.total_items, 3);
        assert_eq!(page.info.total_pages, 2);

        let beyond = backend
            .list_patients(&PatientFilter::default(), PageRequest::new(5, 2))
            .await
            .unwrap();
        assert!(beyond.is_empty());
        assert_eq!(beyond.info.total_items, 3);
    }

    #[tokio::test]
    async fn test_list_filters_case_insensitively() {
        let backend = backend();
        seed_types(&backend).await;
        backend
            .insert_patient(&record(1, "111", "Juan", "PÉREZ"))
            .await
            .unwrap();
        backend
            .insert_patient(&record(2, "222", "Ana", "Ruiz"))
            .await
            .unwrap();

        let filter = PatientFilter {
            full_name: Some("pérez".to_string()),
            ..Default::default()
        };
        let page = backend
            .list_patients(&filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.items[0].id(), 1);

        let filter = PatientFilter {
            full_name: Some("%".to_string()),
            ..Default::default()
        };
        let page = backend
            .list_patients(&filter, PageRequest::default())
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_list_inactive_only_when_asked() {
        let backend = backend();
        seed_types(&backend).await;
        let mut inactive = record(1, "111", "Juan", "Pérez");
        inactive.status = RecordStatus::Inactive;
        backend.insert_patient(&inactive).await.unwrap();

        let active = backend
            .list_patients(&PatientFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(active.info.total_items, 0);

        let filter = PatientFilter::default().with_status(RecordStatus::Inactive);
        let page = backend
            .list_patients(&filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.info.total_items, 1);
        assert_eq!(backend.count_patients().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_identification_types_ordered() {
        let backend = backend();
        seed_types(&backend).await;
        let codes: Vec<String> = backend
            .list_identification_types()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.code)
            .collect();
        assert_eq!(codes, vec!["CC", "CE", "PA", "TI"]);
        assert!(backend.find_identification_type("XX").await.unwrap().is_none());
    }
}
