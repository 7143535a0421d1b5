//! Identification-type lookup entries.

use serde::{Deserialize, Serialize};

use super::RecordStatus;

/// A kind of identity document a patient can be registered with.
///
/// The lookup is read-only for the record store; it is only written when the
/// table is seeded at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationType {
    /// Short code, e.g. `CC` or `PA`.
    #[serde(rename = "codigoTipoIdentificacion")]
    pub code: String,

    /// Display name.
    #[serde(rename = "nombreTipoIdentificacion")]
    pub name: String,

    /// Whether new patients may reference this type.
    #[serde(rename = "estado")]
    pub status: RecordStatus,
}

impl IdentificationType {
    /// Creates an active identification type.
    pub fn active(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            status: RecordStatus::Active,
        }
    }

    /// Returns true if new patients may reference this type.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// The entries written into an empty lookup table at startup.
    pub fn defaults() -> Vec<IdentificationType> {
        vec![
            IdentificationType::active("CC", "Cédula de Ciudadanía"),
            IdentificationType::active("CE", "Cédula de Extranjería"),
            IdentificationType::active("TI", "Tarjeta de Identidad"),
            IdentificationType::active("PA", "Pasaporte"),
        ]
    }
}
