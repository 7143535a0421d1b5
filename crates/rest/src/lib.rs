//! # registry-rest - Patient Registry HTTP API
//!
//! This crate exposes the patient registry over HTTP: operator login, patient
//! create/update/inactivate/read, and filtered, paginated listings.
//!
//! ## Features
//!
//! - **Bearer tokens**: HS256 tokens issued at `/autenticacion`, required on
//!   every `/pacientes` route
//! - **Soft delete**: `DELETE` marks patients inactive, they stay readable
//! - **Listings**: filters on identification number, name, email and status,
//!   newest first, page-number pagination
//! - **Envelope**: every response is `{status, data, message, errors, pagination}`
//!
//! ## Backend Support
//!
//! - `sqlite` - SQLite backend (default)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use registry_persistence::backends::sqlite::SqliteBackend;
//! use registry_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("registry.db")?;
//!     backend.init_schema()?;
//!
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(backend, config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern | Auth |
//! |-----------|-------------|-------------|------|
//! | login | POST | `/autenticacion` | no |
//! | create | POST | `/pacientes` | yes |
//! | list | GET | `/pacientes?params` | yes |
//! | read | GET | `/pacientes/{id}` | yes |
//! | update | PUT | `/pacientes/{id}` | yes |
//! | inactivate | DELETE | `/pacientes/{id}` | yes |
//! | health | GET | `/health` | no |
//! | readiness | GET | `/_readiness` | no |
//!
//! ## Error Handling
//!
//! | HTTP Status | Cause |
//! |-------------|-------|
//! | 400 | Validation failure, duplicate identification number, malformed JSON |
//! | 401 | Missing, invalid or expired token; wrong credentials |
//! | 404 | Unknown patient id |
//! | 500 | Storage failure |
//! | 503 | Storage not ready |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their envelopes
//! - [`config`] - Server configuration
//! - [`state`] - Application state (registry, token authority, configuration)
//! - [`auth`] - Tokens, login and the bearer middleware
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Request body, path and query extractors
//! - [`responses`] - The response envelope
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{AuthConfig, ServerConfig};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use registry_persistence::core::RegistryStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with custom configuration.
///
/// Sets up every route, the bearer middleware on `/pacientes`, and the
/// trace, timeout, body-limit and CORS layers.
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: RegistryStore + 'static,
{
    create_app_with_shared(Arc::new(storage), config)
}

/// Like [`create_app_with_config`], for a backend the caller keeps a handle to.
pub fn create_app_with_shared<S>(storage: Arc<S>, config: ServerConfig) -> Router
where
    S: RegistryStore + 'static,
{
    info!(backend = storage.name(), "Creating patient registry API");

    let state = AppState::new(storage, config.clone());
    let router = routing::create_routes(state);

    // Build middleware stack. The body limit sits outside the timeout, whose
    // inner response body must implement `Default`.
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Parses a comma-separated CORS setting. `None` means `*`, allow anything.
/// Entries that fail to parse, and a `*` mixed into a list, are skipped.
fn cors_entries<T: FromStr>(raw: &str) -> Option<Vec<T>> {
    if raw.trim() == "*" {
        return None;
    }
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty() && *entry != "*")
            .filter_map(|entry| entry.parse().ok())
            .collect(),
    )
}

/// Builds the CORS layer from the `cors_*` settings.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = cors_entries::<HeaderValue>(&config.cors_origins)
        .map_or_else(AllowOrigin::any, AllowOrigin::list);
    let methods = cors_entries::<Method>(&config.cors_methods)
        .map_or_else(AllowMethods::any, AllowMethods::list);
    let headers = cors_entries::<HeaderName>(&config.cors_headers)
        .map_or_else(AllowHeaders::any, AllowHeaders::list);

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level`. Call once at startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "registry_rest={level},registry_persistence={level},patient_registry={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
