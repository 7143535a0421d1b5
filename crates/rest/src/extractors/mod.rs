//! Axum extractors for the patient registry API.
//!
//! - [`JsonBody`] - Lenient JSON object bodies
//! - [`PatientId`] - The `{id}` path segment
//! - [`ListParams`] - Listing filters and page numbers

pub mod json_body;
pub mod list_params;
pub mod patient_id;

pub use json_body::{JsonBody, JsonBodyRejection};
pub use list_params::ListParams;
pub use patient_id::PatientId;
