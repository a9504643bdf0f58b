//! Driven port for the canonical bookings table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::StoreError;
use crate::domain::{CanonicalBooking, StoredBooking};

/// Port for persisting and reading canonical bookings keyed by `booking_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert or fully overwrite the booking with the same `booking_id`.
    async fn upsert(
        &self,
        booking: &CanonicalBooking,
        updated_at: DateTime<Utc>,
    ) -> Result<Uuid, StoreError>;

    /// Remove the booking with this `booking_id`, returning the rows removed.
    async fn delete_by_booking_id(&self, booking_id: i64) -> Result<u64, StoreError>;

    /// Look up one booking by its upstream id.
    async fn find_by_booking_id(
        &self,
        booking_id: i64,
    ) -> Result<Option<StoredBooking>, StoreError>;

    /// Most recently written bookings first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredBooking>, StoreError>;
}

/// Fixture implementation that accepts writes and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBookingRepository;

#[async_trait]
impl BookingRepository for FixtureBookingRepository {
    async fn upsert(
        &self,
        booking: &CanonicalBooking,
        _updated_at: DateTime<Utc>,
    ) -> Result<Uuid, StoreError> {
        Ok(Uuid::from_u64_pair(1, booking.booking_id.unsigned_abs()))
    }

    async fn delete_by_booking_id(&self, _booking_id: i64) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn find_by_booking_id(
        &self,
        _booking_id: i64,
    ) -> Result<Option<StoredBooking>, StoreError> {
        Ok(None)
    }

    async fn list_recent(&self, _limit: u32) -> Result<Vec<StoredBooking>, StoreError> {
        Ok(Vec::new())
    }
}
