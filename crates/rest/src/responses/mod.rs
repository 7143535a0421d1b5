//! Response formatting for the patient registry API.
//!
//! - [`envelope`] - The `{status, data, message, errors, pagination}` wrapper

pub mod envelope;

pub use envelope::ApiResponse;
