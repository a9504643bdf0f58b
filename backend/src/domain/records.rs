//! Canonical commerce records produced by the normalizer and persisted by
//! the reconciler.
//!
//! Identity is the upstream platform's numeric id (`order_id`, `booking_id`).
//! The store assigns its own `id` on first insert and keeps it stable across
//! every later upsert of the same external id.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Provenance tag stamped on every record that originated on the platform.
pub const PLATFORM_SOURCE: &str = "woocommerce";

/// The two record families synchronized from the commerce platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommerceEntity {
    /// Commerce orders.
    Order,
    /// Reservation/slot bookings.
    Booking,
}

impl CommerceEntity {
    /// Singular lowercase name, as used in topics (`order.updated`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Booking => "booking",
        }
    }

    /// Name of the external-id conflict key column.
    pub fn id_field(self) -> &'static str {
        match self {
            Self::Order => "order_id",
            Self::Booking => "booking_id",
        }
    }
}

impl fmt::Display for CommerceEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown entity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown commerce entity `{0}`; expected orders or bookings")]
pub struct UnknownEntity(pub String);

impl FromStr for CommerceEntity {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "order" | "orders" => Ok(Self::Order),
            "booking" | "bookings" => Ok(Self::Booking),
            other => Err(UnknownEntity(other.to_owned())),
        }
    }
}

/// One commerce order as known to this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalOrder {
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
}

/// One reservation/slot booking, optionally tied to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalBooking {
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
}

/// A canonical record of either family.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalRecord {
    /// A normalized order.
    Order(CanonicalOrder),
    /// A normalized booking.
    Booking(CanonicalBooking),
}

impl CanonicalRecord {
    /// Which family this record belongs to.
    pub fn entity(&self) -> CommerceEntity {
        match self {
            Self::Order(_) => CommerceEntity::Order,
            Self::Booking(_) => CommerceEntity::Booking,
        }
    }

    /// Upstream numeric identifier used as the conflict key.
    pub fn external_id(&self) -> i64 {
        match self {
            Self::Order(order) => order.order_id,
            Self::Booking(booking) => booking.booking_id,
        }
    }

    /// Normalized upstream status, if any.
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Order(order) => order.status.as_deref(),
            Self::Booking(booking) => booking.status.as_deref(),
        }
    }

    /// Latest of the record's upstream activity timestamps.
    ///
    /// Orders consider `modified_at`, `created_at`, `date_paid` and
    /// `date_completed`; bookings consider `modified_at` and `created_at`.
    pub fn latest_activity(&self) -> Option<DateTime<Utc>> {
        let stamps = match self {
            Self::Order(order) => vec![
                order.modified_at,
                order.created_at,
                order.date_paid,
                order.date_completed,
            ],
            Self::Booking(booking) => vec![booking.modified_at, booking.created_at],
        };
        stamps.into_iter().flatten().max()
    }

    /// Receipt for this record once the store has assigned `id`.
    pub fn receipt(&self, id: Uuid) -> UpsertReceipt {
        UpsertReceipt {
            entity: self.entity(),
            id,
            external_id: self.external_id(),
        }
    }
}

/// Identity pair returned by a successful upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsertReceipt {
    /// Record family written.
    pub entity: CommerceEntity,
    /// Store-assigned identifier, stable across upserts.
    pub id: Uuid,
    /// Upstream identifier used as the conflict key.
    pub external_id: i64,
}

/// A persisted order with the store's bookkeeping columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredOrder {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub order: CanonicalOrder,
}

/// A persisted booking with the store's bookkeeping columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredBooking {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub booking: CanonicalBooking,
}
