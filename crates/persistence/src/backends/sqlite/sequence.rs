//! SequenceGenerator implementation for SQLite.

use async_trait::async_trait;

use crate::core::{PATIENT_SEQUENCE, SequenceGenerator};
use crate::error::{BackendError, StorageError, StorageResult};

use super::SqliteBackend;

impl SqliteBackend {
    /// Draws the next value of a named sequence.
    ///
    /// The increment and the read happen in one statement, so concurrent
    /// callers never see the same value.
    pub fn next_sequence_value(&self, name: &str) -> StorageResult<i64> {
        let conn = self.get_connection()?;
        conn.query_row(
            "UPDATE sequences SET value = value + 1 WHERE name = ?1 RETURNING value",
            [name],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                StorageError::Backend(BackendError::SchemaError {
                    message: format!("Sequence {} does not exist", name),
                })
            }
            other => StorageError::Backend(BackendError::Internal {
                backend_name: "sqlite".to_string(),
                message: format!("Failed to advance sequence {}: {}", name, other),
                source: None,
            }),
        })
    }
}

#[async_trait]
impl SequenceGenerator for SqliteBackend {
    async fn next_id(&self) -> StorageResult<i64> {
        self.next_sequence_value(PATIENT_SEQUENCE)
    }
}
