//! PostgreSQL-backed booking repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{BookingRepository, StoreError};
use crate::domain::{CanonicalBooking, StoredBooking};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{BookingRow, BookingWriteRow};
use super::pool::DbPool;
use super::schema::bookings;

/// Diesel implementation of [`BookingRepository`].
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn upsert(
        &self,
        booking: &CanonicalBooking,
        updated_at: DateTime<Utc>,
    ) -> Result<Uuid, StoreError> {
        let row = BookingWriteRow::new(booking, updated_at);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(bookings::table)
            .values(&row)
            .on_conflict(bookings::booking_id)
            .do_update()
            .set(&row)
            .returning(bookings::id)
            .get_result::<Uuid>(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "booking upsert"))
    }

    async fn delete_by_booking_id(&self, booking_id: i64) -> Result<u64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(bookings::table.filter(bookings::booking_id.eq(booking_id)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "booking delete"))?;
        Ok(removed as u64)
    }

    async fn find_by_booking_id(
        &self,
        booking_id: i64,
    ) -> Result<Option<StoredBooking>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BookingRow> = bookings::table
            .filter(bookings::booking_id.eq(booking_id))
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "booking lookup"))?;
        Ok(row.map(StoredBooking::from))
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredBooking>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BookingRow> = bookings::table
            .select(BookingRow::as_select())
            .order(bookings::updated_at.desc())
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "booking listing"))?;
        Ok(rows.into_iter().map(StoredBooking::from).collect())
    }
}
