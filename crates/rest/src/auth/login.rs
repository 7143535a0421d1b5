//! Operator login.

use serde::Serialize;
use tracing::{info, warn};

use super::{AuthError, TokenAuthority};
use crate::config::AuthConfig;

/// Token scheme reported to clients.
pub const BEARER: &str = "Bearer";

/// A freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
}

/// Checks the operator credentials and issues a token.
///
/// Empty values count as missing.
pub fn authenticate(
    config: &AuthConfig,
    authority: &TokenAuthority,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<IssuedToken, AuthError> {
    let (Some(username), Some(password)) = (
        username.filter(|u| !u.is_empty()),
        password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AuthError::MissingCredentials);
    };

    if username != config.username || password != config.password {
        warn!(username, "Rejected login");
        return Err(AuthError::InvalidCredentials);
    }

    let token = authority.issue(username)?;
    info!(username, "Operator authenticated");
    Ok(IssuedToken {
        token,
        token_type: BEARER,
    })
}
