//! Bearer token middleware and the caller extractor.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use registry_persistence::startup::SEED_USER;
use tracing::debug;

use super::{AuthError, CallerIdentity, IdentityGate};
use crate::error::RestError;

const BEARER_PREFIX: &str = "Bearer ";

/// Returns the token part of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingToken)
}

/// Rejects requests without a valid bearer token.
///
/// Use with `axum::middleware::from_fn_with_state`. On success the verified
/// [`CallerIdentity`] is inserted into the request extensions.
pub async fn require_auth(
    State(gate): State<Arc<dyn IdentityGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match bearer_token(request.headers()).and_then(|token| gate.verify(token)) {
        Ok(identity) => identity,
        Err(e) => {
            debug!(path = %request.uri().path(), reason = %e, "Unauthenticated request");
            return RestError::from(e).into_response();
        }
    };

    debug!(username = %identity.username, "Authenticated request");
    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// The operator a request runs for.
///
/// Falls back to `SYSTEM` when no identity was attached, which only happens
/// on routes outside [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub CallerIdentity);

impl Caller {
    /// Returns the user name recorded in the audit columns.
    pub fn username(&self) -> &str {
        &self.0.username
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .unwrap_or_else(|| CallerIdentity::new(SEED_USER));
        Ok(Caller(identity))
    }
}
