//! HTTP request handlers for the patient registry.
//!
//! - [`login`] - Issue a bearer token
//! - [`create`] - Register a patient
//! - [`update`] - Partially update a patient
//! - [`delete`] - Inactivate a patient
//! - [`read`] - Read a patient by id
//! - [`list`] - Filtered, paginated listing
//! - [`health`] - Liveness and readiness checks

pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod login;
pub mod read;
pub mod update;

// Re-export handlers for convenience
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, readiness_handler};
pub use list::list_handler;
pub use login::login_handler;
pub use read::read_handler;
pub use update::update_handler;
