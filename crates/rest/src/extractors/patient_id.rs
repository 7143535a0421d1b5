//! Patient id path extractor.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::{PATIENT_NOT_FOUND, RestError};

/// The `{id}` segment of `/pacientes/{id}`.
///
/// An id that is not an integer can't match any record, so it is rejected
/// with the same 404 as an unknown id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientId(pub i64);

impl PatientId {
    /// Parses a raw path segment.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(PatientId)
    }
}

impl<S> FromRequestParts<S> for PatientId
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let not_found = || RestError::NotFound {
            message: PATIENT_NOT_FOUND.to_string(),
        };
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found())?;
        PatientId::parse(&raw).ok_or_else(not_found)
    }
}
