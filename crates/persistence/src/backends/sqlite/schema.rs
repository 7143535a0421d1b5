//! SQLite schema bootstrap.
//!
//! Every statement is idempotent, so the bootstrap runs on each start.

use rusqlite::Connection;

use crate::core::PATIENT_SEQUENCE;
use crate::error::{BackendError, StorageError, StorageResult};

fn schema_error(what: &str, e: rusqlite::Error) -> StorageError {
    StorageError::Backend(BackendError::SchemaError {
        message: format!("Failed to create {}: {}", what, e),
    })
}

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS identification_types (
            code TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'A'
        )",
        [],
    )
    .map_err(|e| schema_error("identification_types table", e))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS patients (
            id INTEGER PRIMARY KEY NOT NULL,
            identification_type_code TEXT NOT NULL
                REFERENCES identification_types(code),
            identification_number TEXT NOT NULL UNIQUE,
            first_given_name TEXT NOT NULL,
            second_given_name TEXT,
            first_family_name TEXT NOT NULL,
            second_family_name TEXT,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'A',
            created_at TEXT NOT NULL,
            created_by TEXT NOT NULL,
            modified_at TEXT,
            modified_by TEXT
        )",
        [],
    )
    .map_err(|e| schema_error("patients table", e))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sequences (
            name TEXT PRIMARY KEY NOT NULL,
            value INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| schema_error("sequences table", e))?;

    conn.execute(
        "INSERT OR IGNORE INTO sequences (name, value) VALUES (?1, 0)",
        [PATIENT_SEQUENCE],
    )
    .map_err(|e| schema_error("patient sequence", e))?;

    create_indexes(conn)?;

    Ok(())
}

/// Create indexes for the listing filters.
fn create_indexes(conn: &Connection) -> StorageResult<()> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_patients_status ON patients(status, id)",
        "CREATE INDEX IF NOT EXISTS idx_patients_type ON patients(identification_type_code)",
    ];

    for index_sql in &indexes {
        conn.execute(index_sql, [])
            .map_err(|e| schema_error("index", e))?;
    }

    Ok(())
}
