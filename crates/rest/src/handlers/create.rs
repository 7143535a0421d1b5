//! Patient create handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
};
use registry_persistence::core::RegistryStore;
use tracing::debug;

use crate::auth::Caller;
use crate::error::{PatientOperation, RestError, RestResult};
use crate::extractors::JsonBody;
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Handler for registering a patient.
///
/// # HTTP Request
///
/// `POST [base]/pacientes`
///
/// # Response
///
/// - `201 Created` - the stored patient, joined with its identification type
/// - `400 Bad Request` - missing fields, bad email, unknown or inactive
///   identification type, or a duplicate identification number
///
/// # Example
///
/// ```http
/// POST /pacientes HTTP/1.1
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {"codigoTipoIdentificacion": "CC", "numeroIdentificacion": "111",
///  "primerNombre": "Juan", "primerApellido": "Pérez", "email": "juan@example.com"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    caller: Caller,
    body: JsonBody,
) -> RestResult<Response>
where
    S: RegistryStore + 'static,
{
    debug!(caller = %caller.username(), "Processing create request");

    let patient = state
        .registry()
        .create(body.new_patient(), caller.username())
        .await
        .map_err(|e| RestError::from_storage(e, PatientOperation::Create))?;

    Ok(ApiResponse::success(patient, "Paciente creado exitosamente")
        .with_status(StatusCode::CREATED))
}
