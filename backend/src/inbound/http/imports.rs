//! Admin bulk import triggers.
//!
//! ```text
//! POST /api/v1/admin/import/orders
//! POST /api/v1/admin/import/bookings
//! ```
//!
//! The body is optional; an empty body imports every record with default
//! paging.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::bulk_import::MAX_PER_PAGE;
use crate::domain::coercion::coerce_timestamp;
use crate::domain::ports::{BulkImportRequest, ImportSummary};
use crate::domain::{CommerceEntity, Error, split_statuses};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ImportSummarySchema};
use crate::inbound::http::state::HttpState;

/// Import trigger body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequestBody {
    /// Records per page; clamped to `1..=100`.
    #[schema(example = 50)]
    pub per_page: Option<i64>,
    /// Page-count ceiling; raised to at least 1.
    pub pages: Option<i64>,
    /// Status allow-list as a string (comma-separated allowed) or array.
    pub status: Option<StatusFilterBody>,
    /// Skip records with no activity at or after this instant.
    #[schema(example = "2026-01-01T00:00:00Z")]
    pub since: Option<String>,
}

/// Status filter accepted as one string or a list.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum StatusFilterBody {
    One(String),
    Many(Vec<String>),
}

impl StatusFilterBody {
    fn statuses(&self) -> Vec<String> {
        match self {
            Self::One(value) => split_statuses([value.as_str()]),
            Self::Many(values) => split_statuses(values.iter().map(String::as_str)),
        }
    }
}

/// Body returned for a completed import.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponseBody {
    pub ok: bool,
    #[schema(value_type = ImportSummarySchema)]
    pub summary: ImportSummary,
}

/// Body returned when the platform could not be paged.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportFailureBody {
    pub ok: bool,
    pub error: String,
}

fn parse_body(body: &[u8]) -> Result<ImportRequestBody, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ImportRequestBody::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_request(format!("invalid import request: {err}"))
            .with_details(json!({"code": "invalid_json"}))
    })
}

fn build_request(
    entity: CommerceEntity,
    body: ImportRequestBody,
) -> Result<BulkImportRequest, Error> {
    let per_page = body
        .per_page
        .map(|value| value.clamp(1, i64::from(MAX_PER_PAGE)))
        .and_then(|value| u32::try_from(value).ok());
    let max_pages = body
        .pages
        .map(|value| value.clamp(1, i64::from(u32::MAX)))
        .and_then(|value| u32::try_from(value).ok());
    let since = match body.since.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            coerce_timestamp(Some(&Value::String(raw.to_owned()))).ok_or_else(|| {
                Error::invalid_request("since must be an ISO-8601 timestamp")
                    .with_details(json!({"field": "since", "value": raw}))
            })?,
        ),
    };
    Ok(BulkImportRequest {
        entity,
        per_page,
        max_pages,
        statuses: body
            .status
            .as_ref()
            .map(StatusFilterBody::statuses)
            .unwrap_or_default(),
        since,
    })
}

async fn run_import(
    state: &HttpState,
    entity: CommerceEntity,
    body: &[u8],
) -> ApiResult<HttpResponse> {
    let request = build_request(entity, parse_body(body)?)?;
    match state.imports.import(request).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ImportResponseBody { ok: true, summary })),
        Err(err) => {
            error!(%entity, error = %err, "bulk import aborted");
            Ok(HttpResponse::BadGateway().json(ImportFailureBody {
                ok: false,
                error: err.to_string(),
            }))
        }
    }
}

/// Import orders from the commerce platform.
#[utoipa::path(
    post,
    path = "/api/v1/admin/import/orders",
    request_body(content = ImportRequestBody, content_type = "application/json", description = "Optional; an empty body imports everything"),
    responses(
        (status = 200, description = "Import finished; per-record failures are listed", body = ImportResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 502, description = "Commerce platform unreachable", body = ImportFailureBody)
    ),
    tags = ["admin"],
    operation_id = "importOrders"
)]
#[post("/admin/import/orders")]
pub async fn import_orders(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    run_import(&state, CommerceEntity::Order, &body).await
}

/// Import bookings from the commerce platform.
#[utoipa::path(
    post,
    path = "/api/v1/admin/import/bookings",
    request_body(content = ImportRequestBody, content_type = "application/json", description = "Optional; an empty body imports everything"),
    responses(
        (status = 200, description = "Import finished; per-record failures are listed", body = ImportResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 502, description = "Commerce platform unreachable", body = ImportFailureBody)
    ),
    tags = ["admin"],
    operation_id = "importBookings"
)]
#[post("/admin/import/bookings")]
pub async fn import_bookings(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    run_import(&state, CommerceEntity::Booking, &body).await
}
