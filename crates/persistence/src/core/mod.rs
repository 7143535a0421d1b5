//! Core storage traits and abstractions.
//!
//! - [`Backend`] - Database driver abstraction (health, schema bootstrap)
//! - [`PatientStorage`] - Patient rows
//! - [`IdentificationTypeStorage`] - Identification-type lookup
//! - [`SequenceGenerator`] - Patient id source
//!
//! [`RegistryStore`] bundles all four; it is what
//! [`PatientRegistry`](crate::registry::PatientRegistry) and the HTTP layer
//! are generic over.
//!
//! # Example: Implementing a Storage Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use registry_persistence::core::SequenceGenerator;
//! use registry_persistence::error::StorageResult;
//!
//! struct Counter(std::sync::atomic::AtomicI64);
//!
//! #[async_trait]
//! impl SequenceGenerator for Counter {
//!     async fn next_id(&self) -> StorageResult<i64> {
//!         Ok(self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1)
//!     }
//! }
//! ```

pub mod backend;
pub mod sequence;
pub mod storage;

pub use backend::{Backend, BackendKind};
pub use sequence::{PATIENT_SEQUENCE, SequenceGenerator};
pub use storage::{IdentificationTypeStorage, PatientMutation, PatientStorage};

/// Everything the registry needs from a storage backend.
pub trait RegistryStore:
    Backend + PatientStorage + IdentificationTypeStorage + SequenceGenerator
{
}

impl<T> RegistryStore for T where
    T: Backend + PatientStorage + IdentificationTypeStorage + SequenceGenerator
{
}
