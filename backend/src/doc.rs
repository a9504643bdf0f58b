//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer and the
//! schema wrappers from [`crate::inbound::http::schemas`]. The document is
//! served by Swagger UI in debug builds and printed by `openapi-dump`.

use crate::inbound::http::imports::{
    ImportFailureBody, ImportRequestBody, ImportResponseBody, StatusFilterBody,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, ImportFailureSchema, ImportSummarySchema, StoredBookingSchema,
    StoredOrderSchema, SyncActionSchema,
};
use crate::inbound::http::sync::ResyncResponseBody;
use crate::inbound::http::webhooks::{WebhookAckBody, WebhookFailureBody};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Describe the webhook signature header as a security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "WebhookSignature",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-WC-Webhook-Signature",
                "base64(HMAC-SHA256(shared secret, raw request body)).",
            ))),
        );
    }
}

/// OpenAPI document for the sync service.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Commerce sync API",
        description = "Webhook receivers, bulk import triggers and read access for orders and bookings mirrored from the commerce platform."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::webhooks::order_webhook,
        crate::inbound::http::webhooks::booking_webhook,
        crate::inbound::http::imports::import_orders,
        crate::inbound::http::imports::import_bookings,
        crate::inbound::http::sync::resync_record,
        crate::inbound::http::records::list_orders,
        crate::inbound::http::records::get_order,
        crate::inbound::http::records::list_bookings,
        crate::inbound::http::records::get_booking,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        StoredOrderSchema,
        StoredBookingSchema,
        SyncActionSchema,
        ImportSummarySchema,
        ImportFailureSchema,
        WebhookAckBody,
        WebhookFailureBody,
        ImportRequestBody,
        StatusFilterBody,
        ImportResponseBody,
        ImportFailureBody,
        ResyncResponseBody,
    )),
    tags(
        (name = "webhooks", description = "Signed push deliveries from the commerce platform"),
        (name = "admin", description = "Bulk import and single-record resync"),
        (name = "records", description = "Reconciled orders and bookings"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn registers_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/webhooks/orders",
            "/api/v1/webhooks/bookings",
            "/api/v1/admin/import/orders",
            "/api/v1/admin/import/bookings",
            "/api/v1/admin/sync/{entity}/{id}",
            "/api/v1/orders",
            "/api/v1/orders/{order_id}",
            "/api/v1/bookings",
            "/api/v1/bookings/{booking_id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn stored_order_schema_carries_conflict_key() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let order = schemas
            .get("crate.domain.StoredOrder")
            .expect("StoredOrder schema");

        assert_object_schema_has_field(order, "order_id");
        assert_object_schema_has_field(order, "raw_payload");
    }

    #[test]
    fn declares_the_webhook_signature_scheme() {
        let doc = ApiDoc::openapi();
        let schemes = doc
            .components
            .as_ref()
            .and_then(|components| components.security_schemes.get("WebhookSignature"));
        assert!(schemes.is_some());
    }
}
