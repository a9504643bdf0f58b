//! Single-record resync from the platform's detail endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::delete_intent::has_delete_status;
use super::normalizer::normalize_record;
use super::ports::{
    CommerceSource, RecordReconciler, ResyncCommand, ResyncError, ResyncOutcome, SyncAction,
};
use super::CommerceEntity;

/// Domain service implementing [`ResyncCommand`].
#[derive(Clone)]
pub struct ResyncService {
    source: Arc<dyn CommerceSource>,
    reconciler: Arc<dyn RecordReconciler>,
}

impl ResyncService {
    pub fn new(source: Arc<dyn CommerceSource>, reconciler: Arc<dyn RecordReconciler>) -> Self {
        Self { source, reconciler }
    }
}

#[async_trait]
impl ResyncCommand for ResyncService {
    async fn resync(
        &self,
        entity: CommerceEntity,
        external_id: i64,
    ) -> Result<ResyncOutcome, ResyncError> {
        let raw = self
            .source
            .fetch_record(entity, external_id)
            .await
            .map_err(|err| ResyncError::source(err.to_string()))?
            .ok_or_else(|| ResyncError::not_found(entity.as_str(), external_id))?;

        let mut outcome = ResyncOutcome {
            action: SyncAction::Noop,
            entity,
            external_id,
            store_id: None,
        };

        if has_delete_status(&raw) {
            let removed = self
                .reconciler
                .delete(entity, external_id)
                .await
                .map_err(|err| ResyncError::store(err.to_string()))?;
            if removed > 0 {
                outcome.action = SyncAction::Deleted;
            }
            info!(%entity, external_id, removed, "resync removed trashed record");
            return Ok(outcome);
        }

        let record = normalize_record(entity, &raw)
            .map_err(|err| ResyncError::mapping(err.to_string()))?;
        let receipt = self
            .reconciler
            .upsert(&record)
            .await
            .map_err(|err| ResyncError::store(err.to_string()))?;
        outcome.action = SyncAction::Upserted;
        outcome.store_id = Some(receipt.id);
        info!(%entity, external_id, store_id = %receipt.id, "resync upserted record");
        Ok(outcome)
    }
}
