//! Patient record lifecycle.
//!
//! [`PatientRegistry`] owns the rules for creating, updating, inactivating and
//! reading patients; storage backends only move rows. Checks run in a fixed
//! order so callers always get the same error for the same input:
//!
//! - create: required fields, email format, identification type, duplicate
//!   identification number
//! - update: existence, immutable fields, email format

mod validation;

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::core::RegistryStore;
use crate::error::{StorageError, StorageResult, ValidationError};
use crate::types::{
    NewPatient, Page, PageRequest, Patient, PatientChanges, PatientFilter, PatientRecord,
    RecordStatus,
};

pub use validation::{REQUIRED_FIELDS, check_email, check_required, is_valid_email};

/// Empty optional names are stored as null.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Lifecycle operations over a [`RegistryStore`].
#[derive(Debug)]
pub struct PatientRegistry<S> {
    store: Arc<S>,
}

impl<S> Clone for PatientRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RegistryStore> PatientRegistry<S> {
    /// Creates a registry over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Registers a new active patient on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// * `ValidationError::MissingRequiredFields` - a required field is absent or empty
    /// * `ValidationError::InvalidEmail` - the email is malformed
    /// * `ValidationError::UnknownIdentificationType` - the type is missing or inactive
    /// * `ResourceError::AlreadyExists` - the identification number is taken
    pub async fn create(&self, input: NewPatient, caller: &str) -> StorageResult<Patient> {
        check_required(&input)?;

        let NewPatient {
            identification_type_code: Some(type_code),
            identification_number: Some(number),
            first_given_name: Some(first_given_name),
            second_given_name,
            first_family_name: Some(first_family_name),
            second_family_name,
            email: Some(email),
        } = input
        else {
            // check_required guarantees every required field is present.
            return Err(ValidationError::MissingRequiredFields {
                fields: REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
            }
            .into());
        };

        check_email(&email)?;

        let active_type = self
            .store
            .find_identification_type(&type_code)
            .await?
            .filter(|entry| entry.is_active());
        if active_type.is_none() {
            return Err(ValidationError::UnknownIdentificationType { code: type_code }.into());
        }

        if self.store.identification_number_exists(&number).await? {
            return Err(StorageError::duplicate_identification_number(&number));
        }

        let id = self.store.next_id().await?;
        let mut record = PatientRecord {
            id,
            identification_type_code: type_code,
            identification_number: number,
            first_given_name,
            second_given_name: non_empty(second_given_name),
            first_family_name,
            second_family_name: non_empty(second_family_name),
            full_name: String::new(),
            email,
            status: RecordStatus::Active,
            created_at: Utc::now(),
            created_by: caller.to_string(),
            modified_at: None,
            modified_by: None,
        };
        record.refresh_full_name();

        let patient = self.store.insert_patient(&record).await?;
        info!(id = patient.id(), caller, "Patient created");
        Ok(patient)
    }

    /// Applies a partial update on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// * `ResourceError::NotFound` - no patient has this id
    /// * `ValidationError::ImmutableFields` - the identification type or number was supplied
    /// * `ValidationError::InvalidEmail` - a new email is malformed
    pub async fn update(
        &self,
        id: i64,
        changes: PatientChanges,
        caller: &str,
    ) -> StorageResult<Patient> {
        let caller = caller.to_string();
        let patient = self
            .store
            .update_patient_with(
                id,
                Box::new(move |record| {
                    let touched = changes.immutable_fields_touched();
                    if !touched.is_empty() {
                        return Err(ValidationError::ImmutableFields { fields: touched }.into());
                    }
                    if let Some(email) = changes.email.as_set() {
                        check_email(email)?;
                    }

                    changes.apply_to(record);
                    record.refresh_full_name();
                    record.stamp_modified(&caller, Utc::now());
                    Ok(())
                }),
            )
            .await?;

        info!(id, "Patient updated");
        Ok(patient)
    }

    /// Marks a patient inactive on behalf of `caller`.
    ///
    /// Inactivating an inactive patient succeeds and refreshes the
    /// modification stamp.
    pub async fn soft_delete(&self, id: i64, caller: &str) -> StorageResult<Patient> {
        let caller = caller.to_string();
        let patient = self
            .store
            .update_patient_with(
                id,
                Box::new(move |record| {
                    record.status = RecordStatus::Inactive;
                    record.stamp_modified(&caller, Utc::now());
                    Ok(())
                }),
            )
            .await?;

        info!(id, "Patient inactivated");
        Ok(patient)
    }

    /// Reads a patient of any status.
    pub async fn get(&self, id: i64) -> StorageResult<Patient> {
        self.store
            .find_patient(id)
            .await?
            .ok_or_else(|| StorageError::patient_not_found(id))
    }

    /// Lists patients matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &PatientFilter,
        page: PageRequest,
    ) -> StorageResult<Page<Patient>> {
        debug!(
            status = filter.effective_status(),
            page = page.page(),
            page_size = page.page_size(),
            "Listing patients"
        );
        self.store.list_patients(filter, page).await
    }
}
