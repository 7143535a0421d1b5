//! Patient inactivation handler.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use registry_persistence::core::RegistryStore;
use serde_json::Value;
use tracing::debug;

use crate::auth::Caller;
use crate::error::{PatientOperation, RestError, RestResult};
use crate::extractors::PatientId;
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Handler for inactivating a patient.
///
/// Records are never removed; the status moves to `I` and the record stays
/// readable by id. Inactivating an inactive patient succeeds.
///
/// # HTTP Request
///
/// `DELETE [base]/pacientes/{id}`
///
/// # Response
///
/// - `200 OK` - `data: null`
/// - `404 Not Found` - no patient has this id
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    PatientId(id): PatientId,
    caller: Caller,
) -> RestResult<Response>
where
    S: RegistryStore + 'static,
{
    debug!(id, caller = %caller.username(), "Processing delete request");

    state
        .registry()
        .soft_delete(id, caller.username())
        .await
        .map_err(|e| RestError::from_storage(e, PatientOperation::Inactivate))?;

    Ok(ApiResponse::success(Value::Null, "Paciente inactivado exitosamente").into_response())
}
