//! Core types for the persistence layer.
//!
//! - [`PatientRecord`], [`Patient`] - Stored patient rows and their joined form
//! - [`NewPatient`], [`PatientChanges`], [`FieldUpdate`] - Create/update inputs
//! - [`IdentificationType`] - Lookup entries
//! - [`PatientFilter`], [`PageRequest`], [`Page`] - Listing criteria and results
//!
//! # Examples
//!
//! ```
//! use registry_persistence::types::{PageInfo, PageRequest, PatientFilter, RecordStatus};
//!
//! let filter = PatientFilter {
//!     full_name: Some("pérez".to_string()),
//!     ..Default::default()
//! }
//! .with_status(RecordStatus::Inactive);
//! assert_eq!(filter.effective_status(), "I");
//!
//! let request = PageRequest::from_raw(Some("2"), Some("abc"), 1000);
//! assert_eq!(request.page_size(), 10);
//! assert_eq!(PageInfo::new(request, 21).total_pages, 3);
//! ```

mod filter;
mod identification_type;
mod pagination;
mod patient;
mod status;

pub use filter::PatientFilter;
pub use identification_type::IdentificationType;
pub use pagination::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Page, PageInfo, PageRequest, coerce_positive,
};
pub use patient::{
    FieldUpdate, NewPatient, Patient, PatientChanges, PatientRecord, compute_full_name,
};
pub use status::RecordStatus;
