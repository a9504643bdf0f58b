//! Port through which every mutation of canonical records flows.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::{CanonicalRecord, CommerceEntity, UpsertReceipt};

/// Applies canonical records to the store.
///
/// Implementations must rely on the store's atomic conflict-key write;
/// read-then-write sequences would let concurrent deliveries duplicate rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordReconciler: Send + Sync {
    /// Insert or overwrite the record keyed on its external id, stamping a
    /// fresh `updated_at`.
    async fn upsert(&self, record: &CanonicalRecord) -> Result<UpsertReceipt, StoreError>;

    /// Delete at most one record by external id; returns `0` when it was
    /// already absent.
    async fn delete(&self, entity: CommerceEntity, external_id: i64) -> Result<u64, StoreError>;
}
