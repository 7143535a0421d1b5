//! Application state for the patient registry API.
//!
//! Holds the patient registry, the token authority and the server
//! configuration. Everything is behind `Arc`, so cloning per request is
//! cheap.

use std::sync::Arc;

use registry_persistence::core::RegistryStore;
use registry_persistence::registry::PatientRegistry;

use crate::auth::{IdentityGate, TokenAuthority};
use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`RegistryStore`])
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use registry_persistence::backends::sqlite::SqliteBackend;
/// use registry_rest::{AppState, ServerConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = SqliteBackend::in_memory()?;
/// let state = AppState::new(Arc::new(backend), ServerConfig::default());
/// assert_eq!(state.max_page_size(), 1000);
/// # Ok(())
/// # }
/// ```
pub struct AppState<S> {
    /// Patient lifecycle rules over the storage backend.
    registry: PatientRegistry<S>,

    /// Issues and verifies bearer tokens.
    tokens: Arc<TokenAuthority>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            tokens: Arc::clone(&self.tokens),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RegistryStore> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        let tokens = Arc::new(TokenAuthority::from_config(&config.auth));
        Self {
            registry: PatientRegistry::new(storage),
            tokens,
            config: Arc::new(config),
        }
    }

    /// Returns the patient registry.
    pub fn registry(&self) -> &PatientRegistry<S> {
        &self.registry
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        self.registry.store()
    }

    /// Returns the token authority.
    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }

    /// Returns the token authority as an identity gate, for the auth middleware.
    pub fn identity_gate(&self) -> Arc<dyn IdentityGate> {
        self.tokens.clone()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the maximum page size for listings.
    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use registry_persistence::backends::sqlite::SqliteBackend;

    #[test]
    fn test_state_shares_storage() {
        let backend = Arc::new(SqliteBackend::in_memory().unwrap());
        let state = AppState::new(Arc::clone(&backend), ServerConfig::for_testing());
        let clone = state.clone();

        assert!(std::ptr::eq(state.storage(), clone.storage()));
        assert!(std::ptr::eq(state.storage(), backend.as_ref()));
        assert_eq!(clone.max_page_size(), 100);
    }

    #[test]
    fn test_gate_verifies_issued_tokens() {
        let backend = Arc::new(SqliteBackend::in_memory().unwrap());
        let state = AppState::new(backend, ServerConfig::for_testing());
        let token = state.tokens().issue("VERIS").unwrap();
        let identity = state.identity_gate().verify(&token).unwrap();
        assert_eq!(identity.username, "VERIS");
    }
}
