//! Query parameters of `GET /pacientes`.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use registry_persistence::types::{PageRequest, PatientFilter};
use serde::Deserialize;

use crate::error::RestError;

/// Listing filters plus raw page numbers.
///
/// Page numbers stay as text until [`ListParams::page_request`] coerces them,
/// so `?page=abc` falls back to the default instead of rejecting the request.
/// As an extractor it reads the query as raw pairs and keeps the first value
/// of a repeated key, so `?page=1&page=2` is page 1.
///
/// # Example
///
/// ```rust
/// use registry_rest::extractors::ListParams;
///
/// let params: ListParams =
///     serde_json::from_value(serde_json::json!({"estado": "I", "pageSize": "5000"})).unwrap();
/// assert_eq!(params.filter.effective_status(), "I");
/// assert_eq!(params.page_request(1000).page_size(), 1000);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(flatten)]
    pub filter: PatientFilter,

    #[serde(default)]
    pub page: Option<String>,

    #[serde(rename = "pageSize", default)]
    pub page_size: Option<String>,
}

impl ListParams {
    /// Builds params from decoded query pairs. Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "numeroIdentificacion" => &mut params.filter.identification_number,
                "nombreCompleto" => &mut params.filter.full_name,
                "email" => &mut params.filter.email,
                "estado" => &mut params.filter.status,
                "page" => &mut params.page,
                "pageSize" => &mut params.page_size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Coerces the page numbers, capping the size at `max_page_size`.
    pub fn page_request(&self, max_page_size: u32) -> PageRequest {
        PageRequest::from_raw(
            self.page.as_deref(),
            self.page_size.as_deref(),
            max_page_size,
        )
    }
}

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri).map_err(
            |e| RestError::BadRequest {
                message: format!("Parámetros de consulta inválidos: {}", e.body_text()),
            },
        )?;
        Ok(ListParams::from_pairs(pairs))
    }
}
