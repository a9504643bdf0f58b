//! Outbound adapters implementing domain ports.
//!
//! - `commerce`: HTTP client for the commerce platform REST API.
//! - `memory`: process-local record stores.
//! - `persistence`: Diesel/PostgreSQL record stores and migrations.

pub mod commerce;
pub mod memory;
pub mod persistence;
