//! PostgreSQL-backed order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{OrderRepository, StoreError};
use crate::domain::{CanonicalOrder, StoredOrder};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{OrderRow, OrderWriteRow};
use super::pool::DbPool;
use super::schema::orders;

/// Diesel implementation of [`OrderRepository`].
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn upsert(
        &self,
        order: &CanonicalOrder,
        updated_at: DateTime<Utc>,
    ) -> Result<Uuid, StoreError> {
        let row = OrderWriteRow::new(order, updated_at);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(orders::table)
            .values(&row)
            .on_conflict(orders::order_id)
            .do_update()
            .set(&row)
            .returning(orders::id)
            .get_result::<Uuid>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "order upsert"))
    }

    async fn delete_by_order_id(&self, order_id: i64) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(orders::table.filter(orders::order_id.eq(order_id)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "order delete"))?;
        Ok(removed as u64)
    }

    async fn find_by_order_id(&self, order_id: i64) -> Result<Option<StoredOrder>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrderRow> = orders::table
            .filter(orders::order_id.eq(order_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "order lookup"))?;
        Ok(row.map(StoredOrder::from))
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredOrder>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .select(OrderRow::as_select())
            .order(orders::updated_at.desc())
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "order listing"))?;
        Ok(rows.into_iter().map(StoredOrder::from).collect())
    }
}
