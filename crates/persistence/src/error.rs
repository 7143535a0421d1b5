//! Error types for the persistence layer.
//!
//! Errors are grouped the way callers need to react to them: record state
//! (not found, duplicate), input validation, and backend failures. The REST
//! layer maps each group to an HTTP status.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to record state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested record was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A record with the same unique value already exists.
    #[error("{entity} already exists with {field} = {value}")]
    AlreadyExists {
        entity: String,
        field: String,
        value: String,
    },
}

/// Errors related to input validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were missing or empty.
    #[error("missing required fields: {}", fields.join(", "))]
    MissingRequiredFields { fields: Vec<String> },

    /// The email address is malformed.
    #[error("invalid email address: {email}")]
    InvalidEmail { email: String },

    /// The identification type does not exist or is inactive.
    #[error("identification type does not exist or is inactive: {code}")]
    UnknownIdentificationType { code: String },

    /// An update attempted to change fields fixed at creation.
    #[error("immutable fields cannot be modified: {}", fields.join(", "))]
    ImmutableFields { fields: Vec<String> },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema bootstrap error.
    #[error("schema initialization failed: {message}")]
    SchemaError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Shorthand for a missing patient record.
    pub fn patient_not_found(id: i64) -> Self {
        StorageError::Resource(ResourceError::NotFound {
            entity: "patient".to_string(),
            id: id.to_string(),
        })
    }

    /// Shorthand for a duplicate identification number.
    pub fn duplicate_identification_number(number: &str) -> Self {
        StorageError::Resource(ResourceError::AlreadyExists {
            entity: "patient".to_string(),
            field: "identification_number".to_string(),
            value: number.to_string(),
        })
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Resource(ResourceError::NotFound { .. }))
    }

    /// Returns true if this is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::Resource(ResourceError::AlreadyExists { .. })
        )
    }
}
