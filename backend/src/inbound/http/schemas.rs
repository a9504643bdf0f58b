//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialized shape for the generated document
//! and are never constructed.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The record store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The commerce platform failed to answer.
    #[schema(rename = "bad_gateway")]
    BadGateway,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "since must be an ISO-8601 timestamp")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::StoredOrder`].
#[derive(ToSchema)]
#[schema(as = crate::domain::StoredOrder)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct StoredOrderSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "date-time")]
    updated_at: String,
    #[schema(example = 1001)]
    order_id: i64,
    #[schema(example = "processing")]
    status: Option<String>,
    #[schema(example = "EUR")]
    currency: Option<String>,
    /// Decimal amounts are serialized as strings with two decimal places.
    #[schema(example = "49.90")]
    total: Option<String>,
    subtotal: Option<String>,
    discount_total: Option<String>,
    total_tax: Option<String>,
    shipping_total: Option<String>,
    payment_method: Option<String>,
    payment_method_title: Option<String>,
    transaction_id: Option<String>,
    customer_id: Option<i64>,
    customer_email: Option<String>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_note: Option<String>,
    billing: Option<serde_json::Value>,
    shipping: Option<serde_json::Value>,
    line_items: serde_json::Value,
    fee_lines: serde_json::Value,
    coupon_lines: serde_json::Value,
    meta_data: Option<serde_json::Value>,
    #[schema(format = "date-time")]
    created_at: Option<String>,
    #[schema(format = "date-time")]
    modified_at: Option<String>,
    #[schema(format = "date-time")]
    date_paid: Option<String>,
    #[schema(format = "date-time")]
    date_completed: Option<String>,
    #[schema(example = "woocommerce")]
    source: String,
    raw_payload: serde_json::Value,
}

/// OpenAPI schema for [`crate::domain::StoredBooking`].
#[derive(ToSchema)]
#[schema(as = crate::domain::StoredBooking)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct StoredBookingSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "date-time")]
    updated_at: String,
    #[schema(example = 42)]
    booking_id: i64,
    #[schema(example = "confirmed")]
    status: Option<String>,
    product_id: Option<i64>,
    resource_id: Option<i64>,
    order_id: Option<i64>,
    order_item_id: Option<i64>,
    parent_id: Option<i64>,
    customer_id: Option<i64>,
    #[schema(format = "date-time")]
    start_at: Option<String>,
    #[schema(format = "date-time")]
    end_at: Option<String>,
    all_day: bool,
    #[schema(example = "Europe/Berlin")]
    timezone: Option<String>,
    #[schema(example = 3)]
    persons: Option<i32>,
    persons_detail: Option<serde_json::Value>,
    #[schema(example = "120.00")]
    cost: Option<String>,
    #[schema(format = "date-time")]
    created_at: Option<String>,
    #[schema(format = "date-time")]
    modified_at: Option<String>,
    product_name: Option<String>,
    metadata: Option<serde_json::Value>,
    source: String,
    raw_payload: serde_json::Value,
}

/// OpenAPI schema for [`crate::domain::ports::SyncAction`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::SyncAction)]
pub enum SyncActionSchema {
    #[schema(rename = "upserted")]
    Upserted,
    #[schema(rename = "deleted")]
    Deleted,
    #[schema(rename = "noop")]
    Noop,
}

/// OpenAPI schema for [`crate::domain::ports::ImportFailure`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ImportFailure)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ImportFailureSchema {
    /// Upstream id when one could be read from the record.
    id: Option<i64>,
    #[schema(example = "missing id")]
    error: String,
}

/// OpenAPI schema for [`crate::domain::ports::ImportSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ImportSummary)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ImportSummarySchema {
    /// Records read from the platform.
    total: u64,
    upserted: u64,
    /// Records excluded by the status or `since` filters.
    skipped: u64,
    /// Pages fetched, including a terminating empty page.
    pages: u32,
    failures: Vec<ImportFailureSchema>,
}
