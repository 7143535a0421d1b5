//! Health check endpoint handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registry_persistence::core::RegistryStore;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Answers as long as the process is serving requests; storage is not
/// consulted.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler() -> impl IntoResponse {
    debug!("Processing health check request");
    ApiResponse::<()>::message_only("API funcionando correctamente")
}

/// Handler for the readiness check.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - Storage answers
/// - `503 Service Unavailable` - Storage does not answer
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: RegistryStore + 'static,
{
    debug!("Processing readiness check request");

    let storage = state.storage();
    if let Err(e) = storage.health_check().await {
        warn!(backend = storage.name(), error = %e, "Readiness check failed");
        return Err(RestError::ServiceUnavailable {
            message: "Base de datos no disponible".to_string(),
        });
    }

    Ok(ApiResponse::success(
        serde_json::json!({ "backend": storage.name() }),
        "Servicio listo",
    )
    .with_status(StatusCode::OK))
}
