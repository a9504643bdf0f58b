//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between Diesel rows and canonical records.
//! Row structs and table definitions stay private to this module; upserts
//! rely on `INSERT .. ON CONFLICT .. DO UPDATE` so concurrent deliveries of
//! the same external id cannot produce two rows.
//!
//! ```ignore
//! use commerce_sync::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/commerce")).await?;
//! let orders = DieselOrderRepository::new(pool);
//! ```

mod diesel_booking_repository;
pub(crate) mod diesel_helpers;
mod diesel_order_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
