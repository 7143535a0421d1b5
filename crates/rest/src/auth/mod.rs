//! Identity gate for the patient endpoints.
//!
//! Operators log in once with the configured credentials and receive a
//! signed bearer token. Every `/pacientes` request must carry that token;
//! [`require_auth`] verifies it and stores the [`CallerIdentity`] in the
//! request extensions, where handlers pick it up through [`Caller`].
//!
//! - [`token`] - Token issuing and verification
//! - [`login`] - Credential check
//! - [`middleware`] - Bearer header check and the [`Caller`] extractor

pub mod login;
pub mod middleware;
pub mod token;

use thiserror::Error;

pub use login::{IssuedToken, authenticate};
pub use middleware::{Caller, require_auth};
pub use token::{Claims, TokenAuthority};

/// The operator on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Name recorded in the audit columns.
    pub username: String,
}

impl CallerIdentity {
    /// Creates an identity.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Authentication failures.
///
/// The display strings are the messages sent to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Usuario y clave son requeridos")]
    MissingCredentials,

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Token de autenticación requerido")]
    MissingToken,

    #[error("Token inválido o expirado")]
    InvalidToken,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Turns a bearer credential into a caller identity.
pub trait IdentityGate: Send + Sync {
    /// Verifies `bearer` (the token without the `Bearer ` prefix).
    fn verify(&self, bearer: &str) -> Result<CallerIdentity, AuthError>;
}
