//! Lenient JSON body extractor.
//!
//! Request bodies are read as a JSON object and fields are pulled out one by
//! one, so a missing or mistyped field is reported by the business rules
//! instead of failing deserialization. Field values follow JavaScript
//! truthiness: `null`, `false`, `0` and `""` count as not supplied.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registry_persistence::types::{FieldUpdate, NewPatient, PatientChanges};
use serde_json::{Map, Value};

use crate::responses::ApiResponse;

/// A JSON request body.
///
/// An empty body, or one that is valid JSON but not an object, yields an
/// empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBody(pub Map<String, Value>);

/// Rejection for bodies that cannot be read or are not valid JSON.
#[derive(Debug)]
pub enum JsonBodyRejection {
    /// Body could not be read. Carries the status of the underlying failure,
    /// 413 when the body exceeds the configured limit.
    Unreadable { status: StatusCode, detail: String },
    /// Body is not valid JSON.
    InvalidJson(String),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            JsonBodyRejection::Unreadable { status, detail }
                if status == StatusCode::PAYLOAD_TOO_LARGE =>
            {
                (status, "Cuerpo de la solicitud demasiado grande", detail)
            }
            JsonBodyRejection::Unreadable { status, detail } => {
                (status, "Cuerpo de la solicitud inválido", detail)
            }
            JsonBodyRejection::InvalidJson(detail) => {
                (StatusCode::BAD_REQUEST, "Cuerpo de la solicitud inválido", detail)
            }
        };
        ApiResponse::<()>::failure(message)
            .with_errors(vec![detail])
            .with_status(status)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl JsonBody {
    /// Returns the field as text when it is truthy.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).filter(|v| is_truthy(v)).map(to_text)
    }

    /// Returns the field with presence tracked.
    ///
    /// `None` when the key is absent, `Some(None)` when it is falsy.
    pub fn presence(&self, key: &str) -> Option<Option<String>> {
        self.0
            .get(key)
            .map(|v| if is_truthy(v) { Some(to_text(v)) } else { None })
    }

    /// Reads the fields of a create request.
    pub fn new_patient(&self) -> NewPatient {
        NewPatient {
            identification_type_code: self.text("codigoTipoIdentificacion"),
            identification_number: self.text("numeroIdentificacion"),
            first_given_name: self.text("primerNombre"),
            second_given_name: self.text("segundoNombre"),
            first_family_name: self.text("primerApellido"),
            second_family_name: self.text("segundoApellido"),
            email: self.text("email"),
        }
    }

    /// Reads the fields of an update request.
    ///
    /// Required fields sent falsy are left unchanged; optional names sent
    /// falsy are cleared.
    pub fn patient_changes(&self) -> PatientChanges {
        PatientChanges {
            identification_type_code: FieldUpdate::required(
                self.presence("codigoTipoIdentificacion"),
            ),
            identification_number: FieldUpdate::required(self.presence("numeroIdentificacion")),
            first_given_name: FieldUpdate::required(self.presence("primerNombre")),
            second_given_name: FieldUpdate::optional(self.presence("segundoNombre")),
            first_family_name: FieldUpdate::required(self.presence("primerApellido")),
            second_family_name: FieldUpdate::optional(self.presence("segundoApellido")),
            email: FieldUpdate::required(self.presence("email")),
        }
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonBodyRejection::Unreadable {
                status: e.status(),
                detail: e.body_text(),
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody::default());
        }

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| JsonBodyRejection::InvalidJson(e.to_string()))?;

        Ok(match value {
            Value::Object(map) => JsonBody(map),
            _ => JsonBody::default(),
        })
    }
}
