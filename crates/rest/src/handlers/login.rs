//! Login handler.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use registry_persistence::core::RegistryStore;
use tracing::debug;

use crate::auth::authenticate;
use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Handler for operator login.
///
/// # HTTP Request
///
/// `POST [base]/autenticacion` with `{"usuario": "...", "clave": "..."}`
///
/// # Response
///
/// - `200 OK` - `data: {token, type: "Bearer"}`
/// - `400 Bad Request` - user or password missing
/// - `401 Unauthorized` - credentials do not match
pub async fn login_handler<S>(
    State(state): State<AppState<S>>,
    body: JsonBody,
) -> RestResult<Response>
where
    S: RegistryStore + 'static,
{
    debug!("Processing login request");

    let username = body.text("usuario");
    let password = body.text("clave");
    let issued = authenticate(
        &state.config().auth,
        state.tokens(),
        username.as_deref(),
        password.as_deref(),
    )?;

    Ok(ApiResponse::success(issued, "Autenticación exitosa").into_response())
}
