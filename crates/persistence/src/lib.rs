//! Patient Registry Persistence Layer
//!
//! This crate holds the patient record model, the lifecycle rules that keep
//! records consistent, and the storage backends they run on.
//!
//! # Features
//!
//! - **Patient lifecycle**: create, partial update, soft delete, read
//! - **Listings**: filtered, newest-first, page-number pagination
//! - **Identification-type lookup**: seeded reference data joined on every read
//! - **Sequence ids**: monotonic patient ids that are never reused
//!
//! Available backend features:
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Architecture
//!
//! - [`types`] - Records, inputs, filters and pages
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits
//! - [`registry`] - [`PatientRegistry`](registry::PatientRegistry), the lifecycle rules
//! - [`backends`] - Backend implementations
//! - [`startup`] - Database wait and seeding
//!
//! # Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use registry_persistence::backends::sqlite::SqliteBackend;
//! use registry_persistence::registry::PatientRegistry;
//! use registry_persistence::startup::seed;
//! use registry_persistence::types::NewPatient;
//!
//! let backend = Arc::new(SqliteBackend::in_memory()?);
//! backend.init_schema()?;
//! seed(backend.as_ref(), false).await?;
//!
//! let registry = PatientRegistry::new(backend);
//! let patient = registry
//!     .create(
//!         NewPatient {
//!             identification_type_code: Some("CC".to_string()),
//!             identification_number: Some("111".to_string()),
//!             first_given_name: Some("Juan".to_string()),
//!             first_family_name: Some("Pérez".to_string()),
//!             email: Some("juan@example.com".to_string()),
//!             ..Default::default()
//!         },
//!         "VERIS",
//!     )
//!     .await?;
//! assert_eq!(patient.record.full_name, "Juan Pérez");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod registry;
pub mod startup;
pub mod types;
