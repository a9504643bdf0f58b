//! HTTP inbound adapter exposing the webhook, import, resync and read
//! endpoints.

pub mod error;
pub mod health;
pub mod imports;
pub mod records;
pub mod schemas;
pub mod state;
pub mod sync;
#[cfg(test)]
pub mod test_utils;
pub mod webhooks;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// Application data ([`state::HttpState`]) is attached by the caller.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(webhooks::order_webhook)
            .service(webhooks::booking_webhook)
            .service(imports::import_orders)
            .service(imports::import_bookings)
            .service(sync::resync_record)
            .service(records::list_orders)
            .service(records::get_order)
            .service(records::list_bookings)
            .service(records::get_booking),
    );
}
