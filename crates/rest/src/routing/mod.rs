//! Route configuration for the patient registry API.

pub mod registry_routes;

pub use registry_routes::create_routes;
