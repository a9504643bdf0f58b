//! Driving port for re-fetching and re-applying one platform record.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::{SyncAction, define_port_error};
use crate::domain::CommerceEntity;

/// Result of a single-record resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResyncOutcome {
    pub action: SyncAction,
    pub entity: CommerceEntity,
    pub external_id: i64,
    pub store_id: Option<Uuid>,
}

define_port_error! {
    /// Reasons a resync could not complete.
    pub enum ResyncError {
        /// The platform reports no record with this id.
        NotFound { entity: String, external_id: i64 } =>
            "{entity} {external_id} was not found on the commerce platform",
        /// The platform could not be reached or answered badly.
        Source { message: String } =>
            "commerce platform fetch failed: {message}",
        /// The fetched record could not be normalized.
        Mapping { message: String } =>
            "fetched record could not be mapped: {message}",
        /// The store rejected the write.
        Store { message: String } =>
            "fetched record could not be stored: {message}",
    }
}

/// Driving port used by the admin resync endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResyncCommand: Send + Sync {
    /// Fetch the record from the platform and upsert or delete it locally.
    async fn resync(
        &self,
        entity: CommerceEntity,
        external_id: i64,
    ) -> Result<ResyncOutcome, ResyncError>;
}

/// Fixture command for a platform that knows no records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureResyncCommand;

#[async_trait]
impl ResyncCommand for FixtureResyncCommand {
    async fn resync(
        &self,
        entity: CommerceEntity,
        external_id: i64,
    ) -> Result<ResyncOutcome, ResyncError> {
        Err(ResyncError::not_found(entity.as_str(), external_id))
    }
}
