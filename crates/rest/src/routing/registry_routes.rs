//! Patient registry route configuration.

use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use registry_persistence::core::RegistryStore;

use crate::auth::require_auth;
use crate::handlers;
use crate::state::AppState;

/// Creates all patient registry routes.
///
/// # Routes
///
/// ## Public
/// - `POST /autenticacion` - Login
/// - `GET /health` - Health check
/// - `GET /_readiness` - Storage readiness
///
/// ## Bearer token required
/// - `POST /pacientes` - Create
/// - `GET /pacientes` - List
/// - `GET /pacientes/{id}` - Read
/// - `PUT /pacientes/{id}` - Update
/// - `DELETE /pacientes/{id}` - Inactivate
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RegistryStore + 'static,
{
    let patients = Router::new()
        .route(
            "/pacientes",
            post(handlers::create_handler::<S>).get(handlers::list_handler::<S>),
        )
        .route(
            "/pacientes/{id}",
            get(handlers::read_handler::<S>)
                .put(handlers::update_handler::<S>)
                .delete(handlers::delete_handler::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.identity_gate(),
            require_auth,
        ));

    Router::new()
        .route("/autenticacion", post(handlers::login_handler::<S>))
        .route("/health", get(handlers::health_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        .merge(patients)
        .with_state(state)
}
