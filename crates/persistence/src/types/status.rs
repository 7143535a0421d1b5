//! Record status shared by patients and identification types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Active/inactive marker stored as a single-letter code.
///
/// Both lookup entries and patient records carry this flag. Patients only
/// ever move from [`RecordStatus::Active`] to [`RecordStatus::Inactive`]
/// (soft delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecordStatus {
    /// `A`
    #[default]
    #[serde(rename = "A")]
    Active,
    /// `I`
    #[serde(rename = "I")]
    Inactive,
}

impl RecordStatus {
    /// Returns the stored code.
    pub fn as_code(&self) -> &'static str {
        match self {
            RecordStatus::Active => "A",
            RecordStatus::Inactive => "I",
        }
    }

    /// Returns true for [`RecordStatus::Active`].
    pub fn is_active(&self) -> bool {
        matches!(self, RecordStatus::Active)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordStatus::Active),
            "I" => Ok(RecordStatus::Inactive),
            other => Err(format!("unknown record status: {}", other)),
        }
    }
}
