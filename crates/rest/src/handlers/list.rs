//! Patient listing handler.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use registry_persistence::core::RegistryStore;
use tracing::debug;

use crate::error::{PatientOperation, RestError, RestResult};
use crate::extractors::ListParams;
use crate::responses::ApiResponse;
use crate::state::AppState;

/// Handler for listing patients.
///
/// # HTTP Request
///
/// `GET [base]/pacientes?numeroIdentificacion&nombreCompleto&email&estado&page&pageSize`
///
/// Only active patients are listed unless `estado` says otherwise. Results
/// are ordered newest first. Pages past the end are empty but still carry
/// the totals. A repeated query key uses its first value.
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    params: ListParams,
) -> RestResult<Response>
where
    S: RegistryStore + 'static,
{
    let page_request = params.page_request(state.max_page_size());
    debug!(
        filter = ?params.filter,
        page = page_request.page(),
        page_size = page_request.page_size(),
        "Processing list request"
    );

    let page = state
        .registry()
        .list(&params.filter, page_request)
        .await
        .map_err(|e| RestError::from_storage(e, PatientOperation::List))?;

    debug!(
        returned = page.len(),
        total = page.info.total_items,
        "Returning patients"
    );
    Ok(ApiResponse::paginated(page, "Pacientes encontrados").into_response())
}
