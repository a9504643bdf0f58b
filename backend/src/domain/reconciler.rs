//! Store-backed implementation of the [`RecordReconciler`] port.
//!
//! Dispatches canonical records to the repository of their family and stamps
//! the store's `updated_at` bookkeeping column from the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::ports::{BookingRepository, OrderRepository, RecordReconciler, StoreError};
use super::{CanonicalRecord, CommerceEntity, UpsertReceipt};

/// Reconciler writing through the order and booking repositories.
#[derive(Clone)]
pub struct StoreReconciler {
    orders: Arc<dyn OrderRepository>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl StoreReconciler {
    /// Create a reconciler over the given repositories.
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            orders,
            bookings,
            clock,
        }
    }
}

#[async_trait]
impl RecordReconciler for StoreReconciler {
    async fn upsert(&self, record: &CanonicalRecord) -> Result<UpsertReceipt, StoreError> {
        let updated_at = self.clock.utc();
        let id = match record {
            CanonicalRecord::Order(order) => self.orders.upsert(order, updated_at).await?,
            CanonicalRecord::Booking(booking) => self.bookings.upsert(booking, updated_at).await?,
        };
        let receipt = record.receipt(id);
        debug!(
            entity = %receipt.entity,
            external_id = receipt.external_id,
            store_id = %receipt.id,
            "record upserted"
        );
        Ok(receipt)
    }

    async fn delete(&self, entity: CommerceEntity, external_id: i64) -> Result<u64, StoreError> {
        let removed = match entity {
            CommerceEntity::Order => self.orders.delete_by_order_id(external_id).await?,
            CommerceEntity::Booking => self.bookings.delete_by_booking_id(external_id).await?,
        };
        debug!(%entity, external_id, removed, "record delete applied");
        Ok(removed)
    }
}
