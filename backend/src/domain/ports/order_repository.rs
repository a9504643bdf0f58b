//! Driven port for the canonical orders table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::StoreError;
use crate::domain::{CanonicalOrder, StoredOrder};

/// Port for persisting and reading canonical orders keyed by `order_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert or fully overwrite the order with the same `order_id`.
    ///
    /// The store-assigned id survives the overwrite and is returned.
    async fn upsert(
        &self,
        order: &CanonicalOrder,
        updated_at: DateTime<Utc>,
    ) -> Result<Uuid, StoreError>;

    /// Remove the order with this `order_id`, returning the rows removed.
    async fn delete_by_order_id(&self, order_id: i64) -> Result<u64, StoreError>;

    /// Look up one order by its upstream id.
    async fn find_by_order_id(&self, order_id: i64) -> Result<Option<StoredOrder>, StoreError>;

    /// Most recently written orders first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredOrder>, StoreError>;
}

/// Fixture implementation that accepts writes and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn upsert(
        &self,
        order: &CanonicalOrder,
        _updated_at: DateTime<Utc>,
    ) -> Result<Uuid, StoreError> {
        Ok(Uuid::from_u64_pair(0, order.order_id.unsigned_abs()))
    }

    async fn delete_by_order_id(&self, _order_id: i64) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn find_by_order_id(&self, _order_id: i64) -> Result<Option<StoredOrder>, StoreError> {
        Ok(None)
    }

    async fn list_recent(&self, _limit: u32) -> Result<Vec<StoredOrder>, StoreError> {
        Ok(Vec::new())
    }
}
