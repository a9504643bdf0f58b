//! Single-record resync.
//!
//! ```text
//! POST /api/v1/admin/sync/{entity}/{id}
//! ```
//!
//! Re-fetches one record from the platform's detail endpoint and applies it
//! as a webhook would, for deliveries the platform dropped.

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{ResyncError, ResyncOutcome, SyncAction};
use crate::domain::{CommerceEntity, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SyncActionSchema};
use crate::inbound::http::state::HttpState;

/// Body returned for a completed resync.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResyncResponseBody {
    pub ok: bool,
    #[schema(value_type = SyncActionSchema)]
    pub action: SyncAction,
    #[schema(example = "booking")]
    pub entity: String,
    pub external_id: i64,
    pub store_id: Option<Uuid>,
}

impl From<ResyncOutcome> for ResyncResponseBody {
    fn from(outcome: ResyncOutcome) -> Self {
        Self {
            ok: true,
            action: outcome.action,
            entity: outcome.entity.as_str().to_owned(),
            external_id: outcome.external_id,
            store_id: outcome.store_id,
        }
    }
}

fn map_resync_error(err: ResyncError) -> Error {
    match err {
        ResyncError::NotFound { .. } => Error::not_found(err.to_string()),
        ResyncError::Source { .. } => {
            error!(error = %err, "resync fetch failed");
            Error::bad_gateway(err.to_string())
        }
        ResyncError::Mapping { .. } => Error::invalid_request(err.to_string()),
        ResyncError::Store { .. } => {
            error!(error = %err, "resync write failed");
            Error::service_unavailable("record store unavailable")
        }
    }
}

fn parse_entity(raw: &str) -> Result<CommerceEntity, Error> {
    raw.parse::<CommerceEntity>().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "entity",
            "value": raw,
        }))
    })
}

fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            Error::invalid_request("id must be a positive integer").with_details(json!({
                "field": "id",
                "value": raw,
            }))
        })
}

/// Re-fetch and apply one order or booking.
#[utoipa::path(
    post,
    path = "/api/v1/admin/sync/{entity}/{id}",
    params(
        ("entity" = String, Path, description = "orders or bookings"),
        ("id" = i64, Path, description = "Platform id")
    ),
    responses(
        (status = 200, description = "Record applied", body = ResyncResponseBody),
        (status = 400, description = "Invalid entity, id or record", body = ErrorSchema),
        (status = 404, description = "Platform has no such record", body = ErrorSchema),
        (status = 502, description = "Commerce platform unreachable", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "resyncRecord"
)]
#[post("/admin/sync/{entity}/{id}")]
pub async fn resync_record(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (entity, id) = path.into_inner();
    let entity = parse_entity(&entity)?;
    let external_id = parse_id(&id)?;
    let outcome = state
        .resync
        .resync(entity, external_id)
        .await
        .map_err(map_resync_error)?;
    Ok(HttpResponse::Ok().json(ResyncResponseBody::from(outcome)))
}
