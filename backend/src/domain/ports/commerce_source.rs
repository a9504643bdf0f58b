//! Driven port for reading raw records from the commerce platform.
//!
//! Records cross this boundary as untyped JSON; turning them into canonical
//! records is the normalizer's job, not the adapter's.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::CommerceEntity;

define_port_error! {
    /// Errors surfaced while calling the commerce platform.
    pub enum CommerceSourceError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "commerce platform transport failed: {message}",
        /// The platform did not answer within the configured timeout.
        Timeout { message: String } =>
            "commerce platform timeout: {message}",
        /// The platform answered with a non-success status.
        Status { status: u16, message: String } =>
            "commerce platform returned status {status}: {message}",
        /// The response body was not the expected JSON shape.
        Decode { message: String } =>
            "commerce platform response decode failed: {message}",
    }
}

/// Port for paging through and fetching single platform records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommerceSource: Send + Sync {
    /// Fetch one page (1-based) of raw records, newest first.
    async fn fetch_page(
        &self,
        entity: CommerceEntity,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>, CommerceSourceError>;

    /// Fetch one raw record by its upstream id; `None` when the platform
    /// reports it absent.
    async fn fetch_record(
        &self,
        entity: CommerceEntity,
        external_id: i64,
    ) -> Result<Option<Value>, CommerceSourceError>;
}

/// Fixture source for a platform with no records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCommerceSource;

#[async_trait]
impl CommerceSource for FixtureCommerceSource {
    async fn fetch_page(
        &self,
        _entity: CommerceEntity,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<Value>, CommerceSourceError> {
        Ok(Vec::new())
    }

    async fn fetch_record(
        &self,
        _entity: CommerceEntity,
        _external_id: i64,
    ) -> Result<Option<Value>, CommerceSourceError> {
        Ok(None)
    }
}
