//! Commerce platform push webhooks.
//!
//! ```text
//! POST /api/v1/webhooks/orders
//! POST /api/v1/webhooks/bookings
//! ```
//!
//! The body is taken as raw bytes because the signature covers the exact
//! bytes the platform sent. Every response, success or failure, echoes the
//! delivery's `topic` and `delivery_id`.

use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::CommerceEntity;
use crate::domain::ports::{SyncAction, WebhookDelivery, WebhookSyncError, WebhookSyncOutcome};
use crate::inbound::http::state::HttpState;

/// Base64 HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "x-wc-webhook-signature";
/// Event topic, for example `booking.updated`.
pub const TOPIC_HEADER: &str = "x-wc-webhook-topic";
/// Platform-assigned delivery id.
pub const DELIVERY_ID_HEADER: &str = "x-wc-webhook-delivery-id";

const STORE_FAILURE_MESSAGE: &str = "record store unavailable";

/// Body returned for a handled delivery.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebhookAckBody {
    pub ok: bool,
    #[schema(value_type = crate::inbound::http::schemas::SyncActionSchema)]
    pub action: SyncAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<Uuid>,
    pub topic: Option<String>,
    pub delivery_id: Option<String>,
}

impl From<WebhookSyncOutcome> for WebhookAckBody {
    fn from(outcome: WebhookSyncOutcome) -> Self {
        let (order_id, booking_id) = match outcome.entity {
            CommerceEntity::Order => (outcome.external_id, None),
            CommerceEntity::Booking => (None, outcome.external_id),
        };
        Self {
            ok: true,
            action: outcome.action,
            order_id,
            booking_id,
            store_id: outcome.store_id,
            topic: outcome.topic,
            delivery_id: outcome.delivery_id,
        }
    }
}

/// Body returned when a delivery is rejected or could not be applied.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebhookFailureBody {
    pub ok: bool,
    #[schema(example = "unauthorized")]
    pub error: String,
    pub topic: Option<String>,
    pub delivery_id: Option<String>,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn failure_response(error: WebhookSyncError, delivery: &WebhookDelivery) -> HttpResponse {
    let (status, message) = match &error {
        WebhookSyncError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message.clone()),
        WebhookSyncError::MalformedPayload { .. } | WebhookSyncError::Mapping { .. } => {
            (StatusCode::BAD_REQUEST, error.to_string())
        }
        WebhookSyncError::Store { .. } => {
            error!(
                entity = %delivery.entity,
                topic = ?delivery.topic,
                delivery_id = ?delivery.delivery_id,
                %error,
                "webhook record could not be stored"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                STORE_FAILURE_MESSAGE.to_owned(),
            )
        }
    };
    HttpResponse::build(status).json(WebhookFailureBody {
        ok: false,
        error: message,
        topic: delivery.topic.clone(),
        delivery_id: delivery.delivery_id.clone(),
    })
}

async fn handle(
    state: &HttpState,
    entity: CommerceEntity,
    request: &HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let headers = request.headers();
    let delivery = WebhookDelivery {
        entity,
        body: body.to_vec(),
        signature: header_value(headers, SIGNATURE_HEADER),
        topic: header_value(headers, TOPIC_HEADER),
        delivery_id: header_value(headers, DELIVERY_ID_HEADER),
    };
    match state.webhooks.sync(delivery.clone()).await {
        Ok(outcome) => HttpResponse::Ok().json(WebhookAckBody::from(outcome)),
        Err(error) => failure_response(error, &delivery),
    }
}

/// Apply a signed order webhook.
///
/// Deliveries whose topic contains `deleted`, `trash` or `removed`, or whose
/// record status is `trash`/`deleted`, remove the stored order; everything
/// else is upserted on `order_id`.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/orders",
    request_body(content = Object, content_type = "application/json", description = "Order record, bare or wrapped under order/data/resource"),
    params(
        ("X-WC-Webhook-Signature" = String, Header, description = "base64(HMAC-SHA256(secret, body))"),
        ("X-WC-Webhook-Topic" = Option<String>, Header, description = "Event topic"),
        ("X-WC-Webhook-Delivery-ID" = Option<String>, Header, description = "Delivery id")
    ),
    responses(
        (status = 200, description = "Delivery handled", body = WebhookAckBody),
        (status = 400, description = "Malformed payload", body = WebhookFailureBody),
        (status = 401, description = "Signature rejected", body = WebhookFailureBody),
        (status = 503, description = "Record store unavailable", body = WebhookFailureBody)
    ),
    tags = ["webhooks"],
    operation_id = "receiveOrderWebhook"
)]
#[post("/webhooks/orders")]
pub async fn order_webhook(
    state: web::Data<HttpState>,
    request: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    handle(&state, CommerceEntity::Order, &request, body).await
}

/// Apply a signed booking webhook.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/bookings",
    request_body(content = Object, content_type = "application/json", description = "Booking record, bare or wrapped under booking/data/resource"),
    params(
        ("X-WC-Webhook-Signature" = String, Header, description = "base64(HMAC-SHA256(secret, body))"),
        ("X-WC-Webhook-Topic" = Option<String>, Header, description = "Event topic"),
        ("X-WC-Webhook-Delivery-ID" = Option<String>, Header, description = "Delivery id")
    ),
    responses(
        (status = 200, description = "Delivery handled", body = WebhookAckBody),
        (status = 400, description = "Malformed payload", body = WebhookFailureBody),
        (status = 401, description = "Signature rejected", body = WebhookFailureBody),
        (status = 503, description = "Record store unavailable", body = WebhookFailureBody)
    ),
    tags = ["webhooks"],
    operation_id = "receiveBookingWebhook"
)]
#[post("/webhooks/bookings")]
pub async fn booking_webhook(
    state: web::Data<HttpState>,
    request: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    handle(&state, CommerceEntity::Booking, &request, body).await
}

#[cfg(test)]
#[path = "webhooks_tests.rs"]
mod tests;
