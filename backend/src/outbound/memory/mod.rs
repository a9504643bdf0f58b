//! Process-local record stores.
//!
//! Used when no database URL is configured and by integration tests. Each
//! table is a mutex-guarded map keyed by external id, so an upsert is atomic
//! per key and the store-assigned id survives overwrites.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{BookingRepository, OrderRepository, StoreError};
use crate::domain::{CanonicalBooking, CanonicalOrder, StoredBooking, StoredOrder};

struct Entry<R> {
    id: Uuid,
    updated_at: DateTime<Utc>,
    record: R,
}

struct MemoryTable<R> {
    name: &'static str,
    rows: Mutex<HashMap<i64, Entry<R>>>,
}

impl<R: Clone> MemoryTable<R> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<i64, Entry<R>>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::connection(format!("{} table lock poisoned", self.name)))
    }

    fn upsert(&self, key: i64, record: &R, updated_at: DateTime<Utc>) -> Result<Uuid, StoreError> {
        let mut rows = self.lock()?;
        let entry = rows.entry(key).or_insert_with(|| Entry {
            id: Uuid::new_v4(),
            updated_at,
            record: record.clone(),
        });
        entry.updated_at = updated_at;
        entry.record = record.clone();
        Ok(entry.id)
    }

    fn delete(&self, key: i64) -> Result<u64, StoreError> {
        Ok(u64::from(self.lock()?.remove(&key).is_some()))
    }

    fn find<T>(&self, key: i64, build: impl Fn(&Entry<R>) -> T) -> Result<Option<T>, StoreError> {
        Ok(self.lock()?.get(&key).map(build))
    }

    fn recent<T>(&self, limit: u32, build: impl Fn(&Entry<R>) -> T) -> Result<Vec<T>, StoreError> {
        let rows = self.lock()?;
        let mut entries: Vec<&Entry<R>> = rows.values().collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(build)
            .collect())
    }
}

fn stored_order(entry: &Entry<CanonicalOrder>) -> StoredOrder {
    StoredOrder {
        id: entry.id,
        updated_at: entry.updated_at,
        order: entry.record.clone(),
    }
}

fn stored_booking(entry: &Entry<CanonicalBooking>) -> StoredBooking {
    StoredBooking {
        id: entry.id,
        updated_at: entry.updated_at,
        booking: entry.record.clone(),
    }
}

/// In-memory orders table keyed by `order_id`.
pub struct InMemoryOrderRepository {
    table: MemoryTable<CanonicalOrder>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self {
            table: MemoryTable::new("orders"),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn upsert(
        &self,
        order: &CanonicalOrder,
        updated_at: DateTime<Utc>,
    ) -> Result<Uuid, StoreError> {
        self.table.upsert(order.order_id, order, updated_at)
    }

    async fn delete_by_order_id(&self, order_id: i64) -> Result<u64, StoreError> {
        self.table.delete(order_id)
    }

    async fn find_by_order_id(&self, order_id: i64) -> Result<Option<StoredOrder>, StoreError> {
        self.table.find(order_id, stored_order)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredOrder>, StoreError> {
        self.table.recent(limit, stored_order)
    }
}

/// In-memory bookings table keyed by `booking_id`.
pub struct InMemoryBookingRepository {
    table: MemoryTable<CanonicalBooking>,
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self {
            table: MemoryTable::new("bookings"),
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn upsert(
        &self,
        booking: &CanonicalBooking,
        updated_at: DateTime<Utc>,
    ) -> Result<Uuid, StoreError> {
        self.table.upsert(booking.booking_id, booking, updated_at)
    }

    async fn delete_by_booking_id(&self, booking_id: i64) -> Result<u64, StoreError> {
        self.table.delete(booking_id)
    }

    async fn find_by_booking_id(
        &self,
        booking_id: i64,
    ) -> Result<Option<StoredBooking>, StoreError> {
        self.table.find(booking_id, stored_booking)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredBooking>, StoreError> {
        self.table.recent(limit, stored_booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RecordReconciler;
    use crate::domain::test_fixtures::{booking, fixture_clock, fixture_timestamp, order};
    use crate::domain::{CanonicalRecord, StoreReconciler};
    use chrono::Duration;
    use futures_util::future::join_all;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[tokio::test]
    async fn upsert_keeps_the_store_id_and_replaces_fields() {
        let repo = InMemoryOrderRepository::default();
        let first = order(1001);
        let mut second = order(1001);
        second.status = Some("completed".to_owned());

        let id = repo.upsert(&first, fixture_timestamp()).await.expect("insert");
        let later = fixture_timestamp() + Duration::minutes(5);
        let again = repo.upsert(&second, later).await.expect("update");

        assert_eq!(id, again);
        let stored = repo
            .find_by_order_id(1001)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.order.status.as_deref(), Some("completed"));
        assert_eq!(stored.updated_at, later);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_rows_removed() {
        let repo = InMemoryBookingRepository::default();
        repo.upsert(&booking(42), fixture_timestamp())
            .await
            .expect("insert");

        assert_eq!(repo.delete_by_booking_id(42).await.expect("delete"), 1);
        assert_eq!(repo.delete_by_booking_id(42).await.expect("delete"), 0);
        assert!(repo.find_by_booking_id(42).await.expect("find").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn recent_lists_newest_first_up_to_limit() {
        let repo = InMemoryOrderRepository::default();
        for (offset, id) in [(0, 1), (2, 2), (1, 3)] {
            repo.upsert(&order(id), fixture_timestamp() + Duration::minutes(offset))
                .await
                .expect("insert");
        }

        let recent = repo.list_recent(2).await.expect("list");
        let ids: Vec<i64> = recent.iter().map(|row| row.order.order_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_identical_upserts_share_one_row() {
        let orders = Arc::new(InMemoryOrderRepository::default());
        let reconciler = Arc::new(StoreReconciler::new(
            orders.clone(),
            Arc::new(InMemoryBookingRepository::default()),
            fixture_clock(),
        ));

        let tasks = (0..16).map(|_| {
            let reconciler = Arc::clone(&reconciler);
            tokio::spawn(async move {
                reconciler
                    .upsert(&CanonicalRecord::Order(order(1001)))
                    .await
            })
        });
        let receipts: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.expect("task completes").expect("upsert succeeds"))
            .collect();

        let first = receipts[0].id;
        assert!(receipts.iter().all(|receipt| receipt.id == first));
        let rows = orders.list_recent(10).await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, first);
    }
}
