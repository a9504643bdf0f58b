//! Read endpoints over the reconciled store.
//!
//! ```text
//! GET /api/v1/orders?limit=
//! GET /api/v1/orders/{order_id}
//! GET /api/v1/bookings?limit=
//! GET /api/v1/bookings/{booking_id}
//! ```

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use utoipa::IntoParams;

use crate::domain::ports::StoreError;
use crate::domain::{CommerceEntity, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, StoredBookingSchema, StoredOrderSchema};
use crate::inbound::http::state::HttpState;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

/// Listing query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Maximum rows to return, `1..=200`, default 50.
    pub limit: Option<u32>,
}

impl ListQuery {
    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

fn store_unavailable(entity: CommerceEntity, err: &StoreError) -> Error {
    error!(%entity, error = %err, "record store read failed");
    Error::service_unavailable("record store unavailable")
}

fn not_found(entity: CommerceEntity, external_id: i64) -> Error {
    Error::not_found(format!("{entity} {external_id} not found")).with_details(json!({
        "entity": entity.as_str(),
        entity.id_field(): external_id,
    }))
}

/// List the most recently synchronized orders.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(ListQuery),
    responses(
        (status = 200, description = "Orders, newest write first", body = Vec<StoredOrderSchema>),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let orders = state
        .orders
        .list_recent(query.limit())
        .await
        .map_err(|err| store_unavailable(CommerceEntity::Order, &err))?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Fetch one order by its platform id.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    params(("order_id" = i64, Path, description = "Platform order id")),
    responses(
        (status = 200, description = "Stored order", body = StoredOrderSchema),
        (status = 404, description = "Unknown order", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "getOrder"
)]
#[get("/orders/{order_id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let order_id = path.into_inner();
    let order = state
        .orders
        .find_by_order_id(order_id)
        .await
        .map_err(|err| store_unavailable(CommerceEntity::Order, &err))?
        .ok_or_else(|| not_found(CommerceEntity::Order, order_id))?;
    Ok(HttpResponse::Ok().json(order))
}

/// List the most recently synchronized bookings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(ListQuery),
    responses(
        (status = 200, description = "Bookings, newest write first", body = Vec<StoredBookingSchema>),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let bookings = state
        .bookings
        .list_recent(query.limit())
        .await
        .map_err(|err| store_unavailable(CommerceEntity::Booking, &err))?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// Fetch one booking by its platform id.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id" = i64, Path, description = "Platform booking id")),
    responses(
        (status = 200, description = "Stored booking", body = StoredBookingSchema),
        (status = 404, description = "Unknown booking", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["records"],
    operation_id = "getBooking"
)]
#[get("/bookings/{booking_id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let booking_id = path.into_inner();
    let booking = state
        .bookings
        .find_by_booking_id(booking_id)
        .await
        .map_err(|err| store_unavailable(CommerceEntity::Booking, &err))?
        .ok_or_else(|| not_found(CommerceEntity::Booking, booking_id))?;
    Ok(HttpResponse::Ok().json(booking))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::App;
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ports::{BookingRepository, MockOrderRepository, OrderRepository};
    use crate::domain::test_fixtures::{booking, fixture_timestamp, order};
    use crate::outbound::memory::{InMemoryBookingRepository, InMemoryOrderRepository};

    #[rstest]
    #[case(None, 50)]
    #[case(Some(0), 1)]
    #[case(Some(500), 200)]
    #[case(Some(10), 10)]
    fn limit_is_bounded(#[case] requested: Option<u32>, #[case] expected: u32) {
        assert_eq!(ListQuery { limit: requested }.limit(), expected);
    }

    async fn seeded_state() -> HttpState {
        let orders = InMemoryOrderRepository::default();
        let bookings = InMemoryBookingRepository::default();
        orders
            .upsert(&order(1001), fixture_timestamp())
            .await
            .expect("seed order");
        bookings
            .upsert(&booking(42), fixture_timestamp())
            .await
            .expect("seed booking");
        HttpState {
            orders: Arc::new(orders),
            bookings: Arc::new(bookings),
            ..HttpState::default()
        }
    }

    macro_rules! records_app {
        ($state:expr) => {
            actix_web::test::init_service(
                App::new().app_data(web::Data::new($state)).service(
                    web::scope("/api/v1")
                        .service(list_orders)
                        .service(get_order)
                        .service(list_bookings)
                        .service(get_booking),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn returns_stored_records_by_external_id() {
        let app = records_app!(seeded_state().await);

        let res = actix_web::test::call_service(
            &app,
            actix_web::test::TestRequest::get().uri("/api/v1/bookings/42").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_web::test::read_body_json(res).await;
        assert_eq!(body["booking_id"], 42);
        assert!(body["id"].is_string());

        let res = actix_web::test::call_service(
            &app,
            actix_web::test::TestRequest::get().uri("/api/v1/orders?limit=5").to_request(),
        )
        .await;
        let body: Value = actix_web::test::read_body_json(res).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["order_id"], 1001);
    }

    #[actix_web::test]
    async fn unknown_ids_are_not_found() {
        let app = records_app!(seeded_state().await);

        let res = actix_web::test::call_service(
            &app,
            actix_web::test::TestRequest::get().uri("/api/v1/orders/7").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_web::test::read_body_json(res).await;
        assert_eq!(body["details"]["order_id"], 7);
    }

    #[actix_web::test]
    async fn store_failures_are_service_unavailable() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_recent()
            .return_once(|_| Err(StoreError::connection("pool exhausted")));
        let app = records_app!(HttpState {
            orders: Arc::new(orders),
            ..HttpState::default()
        });

        let res = actix_web::test::call_service(
            &app,
            actix_web::test::TestRequest::get().uri("/api/v1/orders").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = actix_web::test::read_body_json(res).await;
        assert_eq!(body["message"], "record store unavailable");
    }
}
