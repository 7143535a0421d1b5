//! Storage traits for patients and the identification-type lookup.
//!
//! These traits only move rows in and out. Validation and lifecycle rules live
//! in [`PatientRegistry`](crate::registry::PatientRegistry), which drives them.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{IdentificationType, Page, PageRequest, Patient, PatientFilter, PatientRecord};

/// A mutation applied to a loaded record inside a storage transaction.
///
/// Returning an error rolls the transaction back and leaves the record as it
/// was.
pub type PatientMutation = Box<dyn FnOnce(&mut PatientRecord) -> StorageResult<()> + Send>;

/// Read access to the identification-type lookup, plus the seeding hook.
#[async_trait]
pub trait IdentificationTypeStorage: Send + Sync {
    /// Looks up a type by code, whatever its status.
    async fn find_identification_type(&self, code: &str)
    -> StorageResult<Option<IdentificationType>>;

    /// Lists every type ordered by code.
    async fn list_identification_types(&self) -> StorageResult<Vec<IdentificationType>>;

    /// Inserts a type. Used when seeding an empty table.
    async fn insert_identification_type(&self, entry: &IdentificationType) -> StorageResult<()>;
}

/// Row-level storage for patient records.
///
/// Every read returns the record joined with its identification type.
#[async_trait]
pub trait PatientStorage: Send + Sync {
    /// Returns true if any record, active or not, uses this number.
    async fn identification_number_exists(&self, number: &str) -> StorageResult<bool>;

    /// Inserts a fully built record and returns it joined.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(AlreadyExists)` - the identification number is taken
    async fn insert_patient(&self, record: &PatientRecord) -> StorageResult<Patient>;

    /// Reads a record by id, whatever its status.
    async fn find_patient(&self, id: i64) -> StorageResult<Option<Patient>>;

    /// Loads a record, applies `mutation` and writes it back in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - no record has this id
    /// * whatever `mutation` returns
    async fn update_patient_with(
        &self,
        id: i64,
        mutation: PatientMutation,
    ) -> StorageResult<Patient>;

    /// Lists records matching `filter`, newest id first.
    async fn list_patients(
        &self,
        filter: &PatientFilter,
        page: PageRequest,
    ) -> StorageResult<Page<Patient>>;

    /// Counts every stored record regardless of status.
    async fn count_patients(&self) -> StorageResult<u64>;
}
