//! Diesel row structs for the commerce record tables.
//!
//! Write rows omit `id` so the database assigns it on first insert and the
//! conflict update leaves it untouched. `treat_none_as_null` makes the
//! conflict update overwrite every column, clearing fields that became
//! absent upstream.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{CanonicalBooking, CanonicalOrder, StoredBooking, StoredOrder};

use super::schema::{bookings, orders};

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct OrderWriteRow {
    pub order_id: i64,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub total: Option<BigDecimal>,
    pub subtotal: Option<BigDecimal>,
    pub discount_total: Option<BigDecimal>,
    pub total_tax: Option<BigDecimal>,
    pub shipping_total: Option<BigDecimal>,
    pub payment_method: Option<String>,
    pub payment_method_title: Option<String>,
    pub transaction_id: Option<String>,
    pub customer_id: Option<i64>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_note: Option<String>,
    pub billing: Option<Value>,
    pub shipping: Option<Value>,
    pub line_items: Value,
    pub fee_lines: Value,
    pub coupon_lines: Value,
    pub meta_data: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub date_paid: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    pub source: String,
    pub raw_payload: Value,
    pub updated_at: DateTime<Utc>,
}

impl OrderWriteRow {
    pub(crate) fn new(order: &CanonicalOrder, updated_at: DateTime<Utc>) -> Self {
        let order = order.clone();
        Self {
            order_id: order.order_id,
            status: order.status,
            currency: order.currency,
            total: order.total,
            subtotal: order.subtotal,
            discount_total: order.discount_total,
            total_tax: order.total_tax,
            shipping_total: order.shipping_total,
            payment_method: order.payment_method,
            payment_method_title: order.payment_method_title,
            transaction_id: order.transaction_id,
            customer_id: order.customer_id,
            customer_email: order.customer_email,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            customer_note: order.customer_note,
            billing: order.billing,
            shipping: order.shipping,
            line_items: order.line_items,
            fee_lines: order.fee_lines,
            coupon_lines: order.coupon_lines,
            meta_data: order.meta_data,
            created_at: order.created_at,
            modified_at: order.modified_at,
            date_paid: order.date_paid,
            date_completed: order.date_completed,
            source: order.source,
            raw_payload: order.raw_payload,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub order_id: i64,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub total: Option<BigDecimal>,
    pub subtotal: Option<BigDecimal>,
    pub discount_total: Option<BigDecimal>,
    pub total_tax: Option<BigDecimal>,
    pub shipping_total: Option<BigDecimal>,
    pub payment_method: Option<String>,
    pub payment_method_title: Option<String>,
    pub transaction_id: Option<String>,
    pub customer_id: Option<i64>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_note: Option<String>,
    pub billing: Option<Value>,
    pub shipping: Option<Value>,
    pub line_items: Value,
    pub fee_lines: Value,
    pub coupon_lines: Value,
    pub meta_data: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub date_paid: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    pub source: String,
    pub raw_payload: Value,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderRow> for StoredOrder {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            updated_at: row.updated_at,
            order: CanonicalOrder {
                order_id: row.order_id,
                status: row.status,
                currency: row.currency,
                total: row.total,
                subtotal: row.subtotal,
                discount_total: row.discount_total,
                total_tax: row.total_tax,
                shipping_total: row.shipping_total,
                payment_method: row.payment_method,
                payment_method_title: row.payment_method_title,
                transaction_id: row.transaction_id,
                customer_id: row.customer_id,
                customer_email: row.customer_email,
                customer_name: row.customer_name,
                customer_phone: row.customer_phone,
                customer_note: row.customer_note,
                billing: row.billing,
                shipping: row.shipping,
                line_items: row.line_items,
                fee_lines: row.fee_lines,
                coupon_lines: row.coupon_lines,
                meta_data: row.meta_data,
                created_at: row.created_at,
                modified_at: row.modified_at,
                date_paid: row.date_paid,
                date_completed: row.date_completed,
                source: row.source,
                raw_payload: row.raw_payload,
            },
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = bookings)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BookingWriteRow {
    pub booking_id: i64,
    pub status: Option<String>,
    pub product_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub order_id: Option<i64>,
    pub order_item_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub timezone: Option<String>,
    pub persons: Option<i32>,
    pub persons_detail: Option<Value>,
    pub cost: Option<BigDecimal>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub product_name: Option<String>,
    pub metadata: Option<Value>,
    pub source: String,
    pub raw_payload: Value,
    pub updated_at: DateTime<Utc>,
}

impl BookingWriteRow {
    pub(crate) fn new(booking: &CanonicalBooking, updated_at: DateTime<Utc>) -> Self {
        let booking = booking.clone();
        Self {
            booking_id: booking.booking_id,
            status: booking.status,
            product_id: booking.product_id,
            resource_id: booking.resource_id,
            order_id: booking.order_id,
            order_item_id: booking.order_item_id,
            parent_id: booking.parent_id,
            customer_id: booking.customer_id,
            start_at: booking.start_at,
            end_at: booking.end_at,
            all_day: booking.all_day,
            timezone: booking.timezone,
            persons: booking.persons,
            persons_detail: booking.persons_detail,
            cost: booking.cost,
            created_at: booking.created_at,
            modified_at: booking.modified_at,
            product_name: booking.product_name,
            metadata: booking.metadata,
            source: booking.source,
            raw_payload: booking.raw_payload,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub booking_id: i64,
    pub status: Option<String>,
    pub product_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub order_id: Option<i64>,
    pub order_item_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub timezone: Option<String>,
    pub persons: Option<i32>,
    pub persons_detail: Option<Value>,
    pub cost: Option<BigDecimal>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
    pub product_name: Option<String>,
    pub metadata: Option<Value>,
    pub source: String,
    pub raw_payload: Value,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingRow> for StoredBooking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            updated_at: row.updated_at,
            booking: CanonicalBooking {
                booking_id: row.booking_id,
                status: row.status,
                product_id: row.product_id,
                resource_id: row.resource_id,
                order_id: row.order_id,
                order_item_id: row.order_item_id,
                parent_id: row.parent_id,
                customer_id: row.customer_id,
                start_at: row.start_at,
                end_at: row.end_at,
                all_day: row.all_day,
                timezone: row.timezone,
                persons: row.persons,
                persons_detail: row.persons_detail,
                cost: row.cost,
                created_at: row.created_at,
                modified_at: row.modified_at,
                product_name: row.product_name,
                metadata: row.metadata,
                source: row.source,
                raw_payload: row.raw_payload,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{booking, fixture_timestamp, order};
    use rstest::rstest;

    #[rstest]
    fn order_write_row_carries_the_clock_stamp() {
        let row = OrderWriteRow::new(&order(12), fixture_timestamp());
        assert_eq!(row.order_id, 12);
        assert_eq!(row.updated_at, fixture_timestamp());
        assert_eq!(row.source, "woocommerce");
    }

    #[rstest]
    fn booking_write_row_keeps_derived_headcount() {
        let row = BookingWriteRow::new(&booking(42), fixture_timestamp());
        assert_eq!(row.booking_id, 42);
        assert_eq!(row.persons, Some(2));
    }
}
