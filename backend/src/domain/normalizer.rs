//! Pure mapping from raw platform records to canonical records.
//!
//! Normalization never performs I/O and never partially fails: a record
//! either maps in full or yields a [`MappingError`]. Only a missing identity
//! is fatal; every other field degrades to `None` when unusable. The raw
//! record is cloned into `raw_payload` untouched.

use bigdecimal::BigDecimal;
use serde_json::{Map, Value, json};

use super::coercion::{
    coerce_bool, coerce_money, coerce_string, derive_persons, first_string, first_timestamp,
    normalize_meta, object_value, parse_external_id, round_money,
};
use super::{
    CanonicalBooking, CanonicalOrder, CanonicalRecord, CommerceEntity, PLATFORM_SOURCE,
};

/// Reasons a raw record cannot become a canonical record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// The record has no `id` that parses to an integer.
    #[error("missing id")]
    MissingId,
    /// The record is not a JSON object.
    #[error("{entity} record must be a JSON object")]
    NotAnObject {
        /// Entity family being mapped.
        entity: CommerceEntity,
    },
}

/// Normalize a raw record of the given family.
pub fn normalize_record(
    entity: CommerceEntity,
    raw: &Value,
) -> Result<CanonicalRecord, MappingError> {
    match entity {
        CommerceEntity::Order => normalize_order(raw).map(CanonicalRecord::Order),
        CommerceEntity::Booking => normalize_booking(raw).map(CanonicalRecord::Booking),
    }
}

/// Normalize a raw platform order.
pub fn normalize_order(raw: &Value) -> Result<CanonicalOrder, MappingError> {
    let object = as_object(raw, CommerceEntity::Order)?;
    let order_id = parse_external_id(object.get("id")).ok_or(MappingError::MissingId)?;
    let billing = object.get("billing").and_then(Value::as_object);

    Ok(CanonicalOrder {
        order_id,
        status: coerce_string(object.get("status")),
        currency: coerce_string(object.get("currency")),
        total: coerce_money(object.get("total")),
        subtotal: coerce_money(object.get("subtotal")).or_else(|| line_item_subtotal(object)),
        discount_total: coerce_money(object.get("discount_total")),
        total_tax: coerce_money(object.get("total_tax")),
        shipping_total: coerce_money(object.get("shipping_total")),
        payment_method: coerce_string(object.get("payment_method")),
        payment_method_title: coerce_string(object.get("payment_method_title")),
        transaction_id: coerce_string(object.get("transaction_id")),
        customer_id: parse_external_id(object.get("customer_id")),
        customer_email: billing.and_then(|b| coerce_string(b.get("email"))),
        customer_name: billing.and_then(full_name),
        customer_phone: billing.and_then(|b| coerce_string(b.get("phone"))),
        customer_note: coerce_string(object.get("customer_note")),
        billing: object_value(object.get("billing")),
        shipping: object_value(object.get("shipping")),
        line_items: opaque_list(object.get("line_items")),
        fee_lines: opaque_list(object.get("fee_lines")),
        coupon_lines: opaque_list(object.get("coupon_lines")),
        meta_data: normalize_meta(object.get("meta_data")),
        created_at: first_timestamp(object, &["date_created_gmt", "date_created"]),
        modified_at: first_timestamp(object, &["date_modified_gmt", "date_modified"]),
        date_paid: first_timestamp(object, &["date_paid_gmt", "date_paid"]),
        date_completed: first_timestamp(object, &["date_completed_gmt", "date_completed"]),
        source: PLATFORM_SOURCE.to_owned(),
        raw_payload: raw.clone(),
    })
}

/// Normalize a raw platform booking.
pub fn normalize_booking(raw: &Value) -> Result<CanonicalBooking, MappingError> {
    let object = as_object(raw, CommerceEntity::Booking)?;
    let booking_id = parse_external_id(object.get("id")).ok_or(MappingError::MissingId)?;
    let persons_raw = ["persons", "person_counts"]
        .iter()
        .find_map(|key| object.get(*key).filter(|value| !value.is_null()));

    Ok(CanonicalBooking {
        booking_id,
        status: coerce_string(object.get("status")),
        product_id: parse_external_id(object.get("product_id")),
        resource_id: parse_external_id(object.get("resource_id")),
        order_id: parse_external_id(object.get("order_id")),
        order_item_id: parse_external_id(object.get("order_item_id")),
        parent_id: parse_external_id(object.get("parent_id")),
        customer_id: parse_external_id(object.get("customer_id")),
        start_at: first_timestamp(object, &["start", "start_date"]),
        end_at: first_timestamp(object, &["end", "end_date"]),
        all_day: coerce_bool(object.get("all_day")),
        timezone: first_string(object, &["local_timezone", "timezone"]),
        persons: derive_persons(persons_raw),
        persons_detail: object_value(persons_raw),
        cost: coerce_money(object.get("cost")),
        created_at: first_timestamp(object, &["date_created_gmt", "date_created"]),
        modified_at: first_timestamp(object, &["date_modified_gmt", "date_modified"]),
        product_name: coerce_string(object.get("product_name")).or_else(|| {
            object
                .get("product")
                .and_then(|product| coerce_string(product.get("name")))
        }),
        metadata: normalize_meta(object.get("meta_data")),
        source: PLATFORM_SOURCE.to_owned(),
        raw_payload: raw.clone(),
    })
}

fn as_object(raw: &Value, entity: CommerceEntity) -> Result<&Map<String, Value>, MappingError> {
    raw.as_object().ok_or(MappingError::NotAnObject { entity })
}

fn opaque_list(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => json!([]),
        Some(other) => other.clone(),
    }
}

fn full_name(billing: &Map<String, Value>) -> Option<String> {
    let name = [billing.get("first_name"), billing.get("last_name")]
        .into_iter()
        .filter_map(coerce_string)
        .collect::<Vec<_>>()
        .join(" ");
    (!name.is_empty()).then_some(name)
}

fn line_item_subtotal(object: &Map<String, Value>) -> Option<BigDecimal> {
    let amounts: Vec<BigDecimal> = object
        .get("line_items")?
        .as_array()?
        .iter()
        .filter_map(|item| coerce_money(item.get("subtotal")))
        .collect();
    if amounts.is_empty() {
        return None;
    }
    let sum = amounts
        .iter()
        .fold(BigDecimal::from(0), |acc, amount| acc + amount);
    Some(round_money(&sum))
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
