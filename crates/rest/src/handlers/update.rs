//! Patient update handler.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use registry_persistence::core::RegistryStore;
use tracing::debug;

use crate::auth::Caller;
use crate::error::{PatientOperation, RestError, RestResult};
use crate::extractors::{JsonBody, PatientId};
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Handler for partially updating a patient.
///
/// Only the supplied fields change. The identification type and number can
/// never be changed; sending either rejects the whole update.
///
/// # HTTP Request
///
/// `PUT [base]/pacientes/{id}`
///
/// # Response
///
/// - `200 OK` - the updated patient
/// - `400 Bad Request` - immutable field supplied, or bad email
/// - `404 Not Found` - no patient has this id
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    PatientId(id): PatientId,
    caller: Caller,
    body: JsonBody,
) -> RestResult<Response>
where
    S: RegistryStore + 'static,
{
    debug!(id, caller = %caller.username(), "Processing update request");

    let patient = state
        .registry()
        .update(id, body.patient_changes(), caller.username())
        .await
        .map_err(|e| RestError::from_storage(e, PatientOperation::Update))?;

    Ok(ApiResponse::success(patient, "Paciente actualizado exitosamente").into_response())
}
