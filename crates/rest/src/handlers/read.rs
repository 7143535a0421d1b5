//! Patient read handler.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use registry_persistence::core::RegistryStore;
use tracing::debug;

use crate::error::{PatientOperation, RestError, RestResult};
use crate::extractors::PatientId;
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Handler for reading a patient by id, whatever its status.
///
/// # HTTP Request
///
/// `GET [base]/pacientes/{id}`
///
/// # Response
///
/// - `200 OK` - the patient, joined with its identification type
/// - `404 Not Found` - no patient has this id
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    PatientId(id): PatientId,
) -> RestResult<Response>
where
    S: RegistryStore + 'static,
{
    debug!(id, "Processing read request");

    let patient = state
        .registry()
        .get(id)
        .await
        .map_err(|e| RestError::from_storage(e, PatientOperation::Read))?;

    Ok(ApiResponse::success(patient, "Paciente encontrado").into_response())
}
