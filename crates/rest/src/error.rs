//! Error types for the patient registry API.
//!
//! Every error renders as the standard response envelope with
//! `status: false`. Storage errors are mapped as follows:
//!
//! | Storage Error | HTTP Status | Message |
//! |--------------|-------------|---------|
//! | ValidationError | 400 | per validation rule |
//! | AlreadyExists | 400 | duplicate identification number |
//! | NotFound | 404 | Paciente no encontrado |
//! | BackendError | 500 | per operation, detail in `errors` |

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registry_persistence::error::{BackendError, ResourceError, StorageError, ValidationError};
use registry_persistence::registry::REQUIRED_FIELDS;
use tracing::error;

use crate::auth::AuthError;
use crate::responses::ApiResponse;

/// Message for a patient id that matches no record.
pub const PATIENT_NOT_FOUND: &str = "Paciente no encontrado";

/// The patient operation a handler was running, used to pick the 500 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientOperation {
    /// POST /pacientes
    Create,
    /// PUT /pacientes/{id}
    Update,
    /// DELETE /pacientes/{id}
    Inactivate,
    /// GET /pacientes/{id}
    Read,
    /// GET /pacientes
    List,
}

impl PatientOperation {
    /// Message sent when the operation fails unexpectedly.
    pub fn failure_message(&self) -> &'static str {
        match self {
            PatientOperation::Create => "Error al crear paciente",
            PatientOperation::Update => "Error al actualizar paciente",
            PatientOperation::Inactivate => "Error al inactivar paciente",
            PatientOperation::Read => "Error al buscar paciente",
            PatientOperation::List => "Error al buscar pacientes",
        }
    }
}

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Invalid input or rule violation (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Missing or rejected credentials (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Record not found (HTTP 404).
    NotFound {
        /// Error message.
        message: String,
    },

    /// Storage not answering (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
        /// Underlying cause, reported in `errors`.
        detail: String,
    },
}

impl RestError {
    /// Maps a storage error raised while running `operation`.
    pub fn from_storage(err: StorageError, operation: PatientOperation) -> Self {
        match err {
            StorageError::Backend(e) => {
                error!(error = %e, operation = ?operation, "Storage failure");
                RestError::InternalError {
                    message: operation.failure_message().to_string(),
                    detail: e.to_string(),
                }
            }
            other => other.into(),
        }
    }

    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            RestError::BadRequest { message }
            | RestError::Unauthorized { message }
            | RestError::NotFound { message }
            | RestError::ServiceUnavailable { message }
            | RestError::InternalError { message, .. } => message,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::NotFound { message } => write!(f, "Not found: {}", message),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            RestError::InternalError { message, detail } => {
                write!(f, "Internal error: {} ({})", message, detail)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = ApiResponse::<()>::failure(self.message());
        if let RestError::InternalError { detail, .. } = self {
            body = body.with_errors(vec![detail]);
        }
        (status, Json(body)).into_response()
    }
}

// Conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { .. } => RestError::NotFound {
                message: PATIENT_NOT_FOUND.to_string(),
            },
            ResourceError::AlreadyExists { .. } => RestError::BadRequest {
                message: "Ya existe un paciente con este número de identificación".to_string(),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        let message = match err {
            ValidationError::MissingRequiredFields { .. } => {
                format!("Campos requeridos: {}", REQUIRED_FIELDS.join(", "))
            }
            ValidationError::InvalidEmail { .. } => "Email inválido".to_string(),
            ValidationError::UnknownIdentificationType { .. } => {
                "El tipo de identificación no existe o está inactivo".to_string()
            }
            ValidationError::ImmutableFields { .. } => {
                "No se pueden modificar codigoTipoIdentificacion y numeroIdentificacion"
                    .to_string()
            }
        };
        RestError::BadRequest { message }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::InternalError {
            message: "Error interno del servidor".to_string(),
            detail: err.to_string(),
        }
    }
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => RestError::BadRequest {
                message: err.to_string(),
            },
            AuthError::Signing(_) => RestError::InternalError {
                message: "Error en el proceso de autenticación".to_string(),
                detail: err.to_string(),
            },
            _ => RestError::Unauthorized {
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
