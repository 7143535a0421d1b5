//! Identifier sequences.

use async_trait::async_trait;

use crate::error::StorageResult;

/// Name of the sequence patient ids are drawn from.
pub const PATIENT_SEQUENCE: &str = "MGM_SEQ_PACIENT";

/// A monotonic source of unique integer ids.
///
/// Values are never repeated, even when the record they were drawn for is
/// never written, and are safe to draw from concurrent callers.
#[async_trait]
pub trait SequenceGenerator: Send + Sync {
    /// Returns the next patient id.
    async fn next_id(&self) -> StorageResult<i64>;
}
