//! Patient record types.
//!
//! [`PatientRecord`] is the stored row, [`Patient`] is a record joined with
//! its identification type (the shape every read returns). [`NewPatient`] and
//! [`PatientChanges`] are the inputs of the create and update operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{IdentificationType, RecordStatus};

/// Joins the non-empty name parts with single spaces.
///
/// Parts are taken in the order given; callers pass first given name, second
/// given name, first family name, second family name.
///
/// # Examples
///
/// ```
/// use registry_persistence::types::compute_full_name;
///
/// let full = compute_full_name([Some("Juan"), None, Some("Pérez"), Some("")]);
/// assert_eq!(full, "Juan Pérez");
/// ```
pub fn compute_full_name<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A stored patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Identifier drawn from the patient sequence. Never reused.
    #[serde(rename = "idPaciente")]
    pub id: i64,

    /// Code of the identification type. Fixed at creation.
    #[serde(rename = "codigoTipoIdentificacion")]
    pub identification_type_code: String,

    /// Identification number, unique across all records. Fixed at creation.
    #[serde(rename = "numeroIdentificacion")]
    pub identification_number: String,

    #[serde(rename = "primerNombre")]
    pub first_given_name: String,

    #[serde(rename = "segundoNombre")]
    pub second_given_name: Option<String>,

    #[serde(rename = "primerApellido")]
    pub first_family_name: String,

    #[serde(rename = "segundoApellido")]
    pub second_family_name: Option<String>,

    /// Derived from the four name parts, see [`compute_full_name`].
    #[serde(rename = "nombreCompleto")]
    pub full_name: String,

    pub email: String,

    #[serde(rename = "estado")]
    pub status: RecordStatus,

    #[serde(rename = "fechaIngreso")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "usuarioIngreso")]
    pub created_by: String,

    #[serde(rename = "fechaModificacion")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(rename = "usuarioModificacion")]
    pub modified_by: Option<String>,
}

impl PatientRecord {
    /// Returns the name parts in full-name order.
    pub fn name_parts(&self) -> [Option<&str>; 4] {
        [
            Some(self.first_given_name.as_str()),
            self.second_given_name.as_deref(),
            Some(self.first_family_name.as_str()),
            self.second_family_name.as_deref(),
        ]
    }

    /// Recomputes [`PatientRecord::full_name`] from the current name parts.
    pub fn refresh_full_name(&mut self) {
        self.full_name = compute_full_name(self.name_parts());
    }

    /// Records who modified the record and when.
    pub fn stamp_modified(&mut self, caller: &str, at: DateTime<Utc>) {
        self.modified_at = Some(at);
        self.modified_by = Some(caller.to_string());
    }
}

/// A patient record joined with its identification type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(flatten)]
    pub record: PatientRecord,

    #[serde(rename = "tipoIdentificacion")]
    pub identification_type: IdentificationType,
}

impl Patient {
    /// Returns the patient id.
    pub fn id(&self) -> i64 {
        self.record.id
    }

    /// Returns the patient status.
    pub fn status(&self) -> RecordStatus {
        self.record.status
    }
}

/// Input of the create operation, as received from the caller.
///
/// Every field is optional here so that missing values can be reported
/// together by the record store instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    #[serde(rename = "codigoTipoIdentificacion", default)]
    pub identification_type_code: Option<String>,

    #[serde(rename = "numeroIdentificacion", default)]
    pub identification_number: Option<String>,

    #[serde(rename = "primerNombre", default)]
    pub first_given_name: Option<String>,

    #[serde(rename = "segundoNombre", default)]
    pub second_given_name: Option<String>,

    #[serde(rename = "primerApellido", default)]
    pub first_family_name: Option<String>,

    #[serde(rename = "segundoApellido", default)]
    pub second_family_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// A single field of a partial update, with presence tracked explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// The field was not supplied (or was supplied falsy for a required field).
    #[default]
    Unchanged,
    /// Store null.
    Clear,
    /// Store the value.
    Set(T),
}

impl FieldUpdate<String> {
    /// Decodes an optional field.
    ///
    /// `None` means the key was absent. An explicit null or empty string
    /// clears the field; anything else sets it.
    pub fn optional(raw: Option<Option<String>>) -> Self {
        match raw {
            None => FieldUpdate::Unchanged,
            Some(None) => FieldUpdate::Clear,
            Some(Some(value)) if value.is_empty() => FieldUpdate::Clear,
            Some(Some(value)) => FieldUpdate::Set(value),
        }
    }

    /// Decodes a required field.
    ///
    /// Required fields can't be cleared: absent, null and empty all leave the
    /// stored value untouched.
    pub fn required(raw: Option<Option<String>>) -> Self {
        match raw {
            Some(Some(value)) if !value.is_empty() => FieldUpdate::Set(value),
            _ => FieldUpdate::Unchanged,
        }
    }
}

impl<T: PartialEq> FieldUpdate<T> {
    /// Returns true if the update leaves the field alone.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }

    /// Returns the value to set, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Applies the update to a required field. `Clear` is ignored.
    ///
    /// Returns true if the stored value changed.
    pub fn apply_required(self, target: &mut T) -> bool {
        match self {
            FieldUpdate::Set(value) if *target != value => {
                *target = value;
                true
            }
            _ => false,
        }
    }

    /// Applies the update to an optional field.
    ///
    /// Returns true if the stored value changed.
    pub fn apply_optional(self, target: &mut Option<T>) -> bool {
        let next = match self {
            FieldUpdate::Unchanged => return false,
            FieldUpdate::Clear => None,
            FieldUpdate::Set(value) => Some(value),
        };
        if *target == next {
            return false;
        }
        *target = next;
        true
    }
}

/// Input of the update operation.
///
/// The identification fields are carried only so the record store can reject
/// attempts to change them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientChanges {
    pub identification_type_code: FieldUpdate<String>,
    pub identification_number: FieldUpdate<String>,
    pub first_given_name: FieldUpdate<String>,
    pub second_given_name: FieldUpdate<String>,
    pub first_family_name: FieldUpdate<String>,
    pub second_family_name: FieldUpdate<String>,
    pub email: FieldUpdate<String>,
}

impl PatientChanges {
    /// Wire names of the immutable fields this update tries to set.
    pub fn immutable_fields_touched(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if !self.identification_type_code.is_unchanged() {
            fields.push("codigoTipoIdentificacion".to_string());
        }
        if !self.identification_number.is_unchanged() {
            fields.push("numeroIdentificacion".to_string());
        }
        fields
    }

    /// Applies the mutable fields to `record`.
    ///
    /// Returns true if any name part changed. The full name is not touched;
    /// the record store recomputes it before persisting.
    pub fn apply_to(self, record: &mut PatientRecord) -> bool {
        let mut names_changed = false;
        names_changed |= self
            .first_given_name
            .apply_required(&mut record.first_given_name);
        names_changed |= self
            .second_given_name
            .apply_optional(&mut record.second_given_name);
        names_changed |= self
            .first_family_name
            .apply_required(&mut record.first_family_name);
        names_changed |= self
            .second_family_name
            .apply_optional(&mut record.second_family_name);
        self.email.apply_required(&mut record.email);
        names_changed
    }
}
