//! Filters for patient listings.

use serde::{Deserialize, Serialize};

use super::RecordStatus;

/// Criteria for listing patients.
///
/// Empty strings are treated as absent. When no status is given the listing
/// only returns active patients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFilter {
    /// Exact identification number.
    #[serde(rename = "numeroIdentificacion", default)]
    pub identification_number: Option<String>,

    /// Case-insensitive substring of the full name.
    #[serde(rename = "nombreCompleto", default)]
    pub full_name: Option<String>,

    /// Case-insensitive substring of the email.
    #[serde(default)]
    pub email: Option<String>,

    /// Exact status code. Unknown codes simply match nothing.
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl PatientFilter {
    /// Returns the identification number criterion, if set.
    pub fn identification_number(&self) -> Option<&str> {
        non_empty(&self.identification_number)
    }

    /// Returns the full-name criterion, if set.
    pub fn full_name(&self) -> Option<&str> {
        non_empty(&self.full_name)
    }

    /// Returns the email criterion, if set.
    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }

    /// Returns the status to match, defaulting to active.
    pub fn effective_status(&self) -> &str {
        non_empty(&self.status).unwrap_or(RecordStatus::Active.as_code())
    }

    /// Sets the status criterion.
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status.as_code().to_string());
        self
    }
}
