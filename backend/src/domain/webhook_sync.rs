//! Webhook delivery handling: authenticate, unwrap, classify, reconcile.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::coercion::parse_external_id;
use super::delete_intent::is_delete_intent;
use super::normalizer::normalize_record;
use super::ports::{
    RecordReconciler, StoreError, SyncAction, WebhookDelivery, WebhookSyncCommand,
    WebhookSyncError, WebhookSyncOutcome,
};
use super::webhook_auth::{VerificationFailure, WebhookAuthenticator, unwrap_envelope};

/// Message returned for every authentication failure, whatever the reason.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// Domain service implementing [`WebhookSyncCommand`].
#[derive(Clone)]
pub struct WebhookSyncService {
    authenticator: WebhookAuthenticator,
    reconciler: Arc<dyn RecordReconciler>,
}

impl WebhookSyncService {
    /// Create a webhook service with an explicit authenticator.
    pub fn new(authenticator: WebhookAuthenticator, reconciler: Arc<dyn RecordReconciler>) -> Self {
        Self {
            authenticator,
            reconciler,
        }
    }
}

fn map_store_error(error: StoreError) -> WebhookSyncError {
    WebhookSyncError::store(error.to_string())
}

#[async_trait]
impl WebhookSyncCommand for WebhookSyncService {
    async fn sync(
        &self,
        delivery: WebhookDelivery,
    ) -> Result<WebhookSyncOutcome, WebhookSyncError> {
        let entity = delivery.entity;
        let verification = self.authenticator.verify(&delivery);
        let topic = verification.topic.clone();
        let delivery_id = verification.delivery_id.clone();

        match &verification.reason {
            None => {}
            Some(VerificationFailure::InvalidJson { message }) => {
                warn!(%entity, ?topic, ?delivery_id, reason = %message, "webhook body is not json");
                return Err(WebhookSyncError::malformed_payload(format!(
                    "invalid json: {message}"
                )));
            }
            Some(reason @ VerificationFailure::SecretNotConfigured) => {
                error!(%entity, ?topic, ?delivery_id, %reason, "webhook rejected");
                return Err(WebhookSyncError::unauthorized(UNAUTHORIZED_MESSAGE));
            }
            Some(reason) => {
                warn!(%entity, ?topic, ?delivery_id, %reason, "webhook rejected");
                return Err(WebhookSyncError::unauthorized(UNAUTHORIZED_MESSAGE));
            }
        }

        let mut outcome = WebhookSyncOutcome {
            action: SyncAction::Noop,
            entity,
            external_id: None,
            store_id: None,
            topic,
            delivery_id,
        };

        let Some(payload) = verification.payload else {
            info!(%entity, topic = ?outcome.topic, "empty webhook delivery acknowledged");
            return Ok(outcome);
        };
        let record = unwrap_envelope(&payload).ok_or_else(|| {
            WebhookSyncError::malformed_payload(format!("no {entity} record with a usable id"))
        })?;
        let external_id = parse_external_id(record.get("id"))
            .ok_or_else(|| WebhookSyncError::malformed_payload("unparseable id"))?;
        outcome.external_id = Some(external_id);

        if is_delete_intent(outcome.topic.as_deref(), record) {
            let removed = self
                .reconciler
                .delete(entity, external_id)
                .await
                .map_err(map_store_error)?;
            if removed > 0 {
                outcome.action = SyncAction::Deleted;
            }
            info!(%entity, external_id, removed, "webhook delete applied");
            return Ok(outcome);
        }

        let canonical = normalize_record(entity, record)
            .map_err(|err| WebhookSyncError::mapping(err.to_string()))?;
        let receipt = self
            .reconciler
            .upsert(&canonical)
            .await
            .map_err(map_store_error)?;
        outcome.action = SyncAction::Upserted;
        outcome.store_id = Some(receipt.id);
        info!(%entity, external_id, store_id = %receipt.id, "webhook upsert applied");
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "webhook_sync_tests.rs"]
mod tests;
