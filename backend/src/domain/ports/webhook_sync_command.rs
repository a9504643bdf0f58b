//! Driving port for applying one signed platform webhook delivery.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::CommerceEntity;

/// One inbound webhook delivery as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookDelivery {
    /// Entity family the receiving endpoint is bound to.
    pub entity: CommerceEntity,
    /// Exact request body bytes, as signed by the platform.
    pub body: Vec<u8>,
    /// Base64 HMAC-SHA256 signature header value.
    pub signature: Option<String>,
    /// Event topic header value, for example `order.updated`.
    pub topic: Option<String>,
    /// Platform delivery id header value.
    pub delivery_id: Option<String>,
}

/// What a sync did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    /// The record was inserted or overwritten.
    Upserted,
    /// The record was removed.
    Deleted,
    /// Nothing changed: empty ping delivery or delete of an absent record.
    Noop,
}

/// Result of a handled delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSyncOutcome {
    pub action: SyncAction,
    pub entity: CommerceEntity,
    /// Upstream id of the record acted on; absent for empty deliveries.
    pub external_id: Option<i64>,
    /// Store id returned by an upsert.
    pub store_id: Option<Uuid>,
    pub topic: Option<String>,
    pub delivery_id: Option<String>,
}

define_port_error! {
    /// Reasons a delivery was rejected or could not be applied.
    pub enum WebhookSyncError {
        /// Signature verification failed or no secret is configured.
        Unauthorized { message: String } =>
            "webhook rejected: {message}",
        /// The body carried no usable record.
        MalformedPayload { message: String } =>
            "malformed webhook payload: {message}",
        /// The record could not be normalized.
        Mapping { message: String } =>
            "webhook record could not be mapped: {message}",
        /// The store rejected the write.
        Store { message: String } =>
            "webhook record could not be stored: {message}",
    }
}

/// Driving port used by the webhook endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookSyncCommand: Send + Sync {
    /// Authenticate, unwrap and apply one delivery.
    async fn sync(&self, delivery: WebhookDelivery)
    -> Result<WebhookSyncOutcome, WebhookSyncError>;
}

/// Fixture command that accepts every delivery without touching a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWebhookSyncCommand;

#[async_trait]
impl WebhookSyncCommand for FixtureWebhookSyncCommand {
    async fn sync(
        &self,
        delivery: WebhookDelivery,
    ) -> Result<WebhookSyncOutcome, WebhookSyncError> {
        Ok(WebhookSyncOutcome {
            action: SyncAction::Noop,
            entity: delivery.entity,
            external_id: None,
            store_id: None,
            topic: delivery.topic,
            delivery_id: delivery.delivery_id,
        })
    }
}
