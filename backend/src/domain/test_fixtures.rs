//! Shared fixtures for domain unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use super::normalizer::{normalize_booking, normalize_order};
use super::{CanonicalBooking, CanonicalOrder};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn raw_order(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "currency": "EUR",
        "total": "120.00",
        "date_created_gmt": "2026-03-01T10:00:00",
        "date_modified_gmt": "2026-03-02T10:00:00"
    })
}

pub(crate) fn raw_booking(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "start": 1_700_000_000,
        "persons": {"adult": 2},
        "date_created": 1_772_000_000
    })
}

pub(crate) fn order(id: i64) -> CanonicalOrder {
    normalize_order(&raw_order(id, "processing")).expect("fixture order maps")
}

pub(crate) fn booking(id: i64) -> CanonicalBooking {
    normalize_booking(&raw_booking(id, "confirmed")).expect("fixture booking maps")
}
