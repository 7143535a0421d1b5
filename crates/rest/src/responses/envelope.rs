//! The response envelope shared by every endpoint.
//!
//! ```json
//! {
//!   "status": true,
//!   "data": { ... },
//!   "message": "Pacientes encontrados",
//!   "pagination": { "page": 1, "pageSize": 10, "totalItems": 2, "totalPages": 1 }
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registry_persistence::types::{Page, PageInfo};
use serde::Serialize;

/// `{status, data?, message?, errors?, pagination?}`.
///
/// Absent members are omitted from the JSON. A present `data` of
/// `serde_json::Value::Null` renders as `"data": null`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// True on success.
    pub status: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            status: true,
            data: Some(data),
            message: Some(message.into()),
            errors: None,
            pagination: None,
        }
    }

    /// A successful response with only a message.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            status: true,
            data: None,
            message: Some(message.into()),
            errors: None,
            pagination: None,
        }
    }

    /// A failed response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            data: None,
            message: Some(message.into()),
            errors: None,
            pagination: None,
        }
    }

    /// Attaches error details.
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// A successful listing with its pagination block.
    pub fn paginated(page: Page<T>, message: impl Into<String>) -> Self {
        Self {
            status: true,
            data: Some(page.items),
            message: Some(message.into()),
            errors: None,
            pagination: Some(page.info),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Pairs the envelope with a status code.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        self.with_status(StatusCode::OK)
    }
}
