//! Best-effort coercions from loosely typed platform JSON into strong types.
//!
//! Every helper here is total: unusable input yields `None` (or a default),
//! never an error. Identity is the only field whose absence aborts a record,
//! and that decision belongs to the normalizer, not to these helpers.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Numbers at or below this magnitude are Unix seconds; above it, milliseconds.
pub const EPOCH_SECONDS_CEILING: f64 = 1_000_000_000_000.0;

const MONEY_SCALE: i64 = 2;

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an upstream identifier given as a number or numeric string.
///
/// Only positive integers qualify; the platform uses `0` for "no reference".
pub fn parse_external_id(value: Option<&Value>) -> Option<i64> {
    let number = match value? {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return (int > 0).then_some(int);
            }
            number.as_f64()?
        }
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                return (int > 0).then_some(int);
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    float_to_whole(number).filter(|int| *int > 0)
}

fn float_to_whole(number: f64) -> Option<i64> {
    if !number.is_finite() || number.fract() != 0.0 {
        return None;
    }
    if number < i64::MIN as f64 || number > i64::MAX as f64 {
        return None;
    }
    Some(number as i64)
}

/// Coerce a timestamp given as epoch seconds, epoch milliseconds, or a date
/// string. Strings without an offset are read as UTC.
pub fn coerce_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Number(number) => from_epoch(number.as_f64()?),
        Value::String(text) => parse_timestamp_str(text),
        _ => None,
    }
}

/// First parseable timestamp among `keys` of `object`.
pub fn first_timestamp(object: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter().find_map(|key| coerce_timestamp(object.get(*key)))
}

fn from_epoch(number: f64) -> Option<DateTime<Utc>> {
    if !number.is_finite() {
        return None;
    }
    let millis = if number.abs() <= EPOCH_SECONDS_CEILING {
        (number * 1000.0).round()
    } else {
        number.round()
    };
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(number) = trimmed.parse::<f64>() {
        return from_epoch(number);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    DateTime::parse_from_rfc2822(trimmed)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Coerce a monetary amount given as a number or formatted string, rounded
/// half-up to two fractional digits.
///
/// Strings keep only digits, `.` and `-` before parsing, so `"$1,234.50"`
/// reads as `1234.50`. Parsing stops at the first character that cannot
/// extend a decimal literal.
pub fn coerce_money(value: Option<&Value>) -> Option<BigDecimal> {
    let parsed = match value? {
        Value::Number(number) => BigDecimal::from_str(&number.to_string()).ok()?,
        Value::String(text) => parse_money_str(text)?,
        _ => return None,
    };
    Some(round_money(&parsed))
}

/// Round an amount to the canonical monetary scale.
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}

fn parse_money_str(text: &str) -> Option<BigDecimal> {
    let stripped: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
        .collect();
    let literal = leading_decimal_literal(&stripped);
    if !literal.bytes().any(|byte| byte.is_ascii_digit()) {
        return None;
    }
    BigDecimal::from_str(literal.trim_end_matches('.')).ok()
}

fn leading_decimal_literal(text: &str) -> &str {
    let mut seen_point = false;
    let mut end = 0;
    for (index, ch) in text.char_indices() {
        let accepted = match ch {
            '-' => index == 0,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            digit if digit.is_ascii_digit() => true,
            _ => false,
        };
        if !accepted {
            break;
        }
        end = index + ch.len_utf8();
    }
    text.get(..end).unwrap_or_default()
}

/// Normalize platform metadata into a single key-value object.
///
/// Accepts an array of `{key, value}` pairs (later keys win) or a plain
/// object. Absent, empty, or unusable input yields `None` so storage can tell
/// "no metadata" apart from an empty structure.
pub fn normalize_meta(value: Option<&Value>) -> Option<Value> {
    let merged = match value? {
        Value::Array(entries) => {
            let mut merged = Map::new();
            for entry in entries {
                let Some(key) = entry.get("key").and_then(meta_key) else {
                    continue;
                };
                let item = entry.get("value").cloned().unwrap_or(Value::Null);
                merged.insert(key, item);
            }
            merged
        }
        Value::Object(object) => object.clone(),
        _ => return None,
    };
    (!merged.is_empty()).then_some(Value::Object(merged))
}

fn meta_key(key: &Value) -> Option<String> {
    match key {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Derive a single headcount from a number or a category→count object.
///
/// Object values that do not parse as non-negative counts are ignored; an
/// object with no parseable counts yields `None`.
pub fn derive_persons(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Object(categories) => {
            let counts: Vec<i64> = categories.values().filter_map(coerce_count).collect();
            if counts.is_empty() {
                return None;
            }
            counts
                .iter()
                .try_fold(0_i64, |acc, count| acc.checked_add(*count))
                .and_then(|total| i32::try_from(total).ok())
        }
        other => coerce_count(other).and_then(|count| i32::try_from(count).ok()),
    }
}

fn coerce_count(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number < 0.0 || number > i64::MAX as f64 {
        return None;
    }
    Some(number.trunc() as i64)
}

/// Coerce a loose boolean (`true`, `1`, `"yes"`). Anything else is `false`.
pub fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        _ => false,
    }
}

/// Coerce a non-empty string; numbers are rendered in decimal.
pub fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// First non-empty string among `keys` of `object`.
pub fn first_string(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| coerce_string(object.get(*key)))
}

/// Clone `value` when it is a JSON object.
pub fn object_value(value: Option<&Value>) -> Option<Value> {
    value.filter(|inner| inner.is_object()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn money(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).expect("fixture amount")
    }

    #[rstest]
    #[case(json!(42), Some(42))]
    #[case(json!("42"), Some(42))]
    #[case(json!(" 17 "), Some(17))]
    #[case(json!(42.0), Some(42))]
    #[case(json!("42.0"), Some(42))]
    #[case(json!(42.5), None)]
    #[case(json!(0), None)]
    #[case(json!("abc"), None)]
    #[case(json!(null), None)]
    #[case(json!({"id": 1}), None)]
    fn parses_external_ids(#[case] raw: Value, #[case] expected: Option<i64>) {
        assert_eq!(parse_external_id(Some(&raw)), expected);
    }

    #[rstest]
    fn seconds_and_milliseconds_resolve_to_the_same_instant() {
        let seconds = coerce_timestamp(Some(&json!(1_700_000_000))).expect("seconds");
        let millis = coerce_timestamp(Some(&json!(1_700_000_000_000_i64))).expect("millis");
        assert_eq!(seconds, millis);
        assert_eq!(seconds.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[rstest]
    fn iso_strings_round_trip() {
        let parsed = coerce_timestamp(Some(&json!("2024-01-01T00:00:00Z"))).expect("iso");
        assert_eq!(
            parsed.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "2024-01-01T00:00:00Z"
        );
    }

    #[rstest]
    #[case(json!("2024-03-05T10:15:00"), "2024-03-05T10:15:00Z")]
    #[case(json!("2024-03-05 10:15:00"), "2024-03-05T10:15:00Z")]
    #[case(json!("2024-03-05"), "2024-03-05T00:00:00Z")]
    #[case(json!("2024-03-05T12:15:00+02:00"), "2024-03-05T10:15:00Z")]
    #[case(json!("1700000000"), "2023-11-14T22:13:20Z")]
    fn accepts_platform_date_shapes(#[case] raw: Value, #[case] expected: &str) {
        let parsed = coerce_timestamp(Some(&raw)).expect("timestamp should parse");
        assert_eq!(
            parsed.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            expected
        );
    }

    #[rstest]
    #[case(json!("not a date"))]
    #[case(json!(""))]
    #[case(json!(null))]
    #[case(json!(true))]
    #[case(json!({"date": "2024-01-01"}))]
    fn unparseable_timestamps_yield_none(#[case] raw: Value) {
        assert_eq!(coerce_timestamp(Some(&raw)), None);
    }

    #[rstest]
    #[case(json!(12.5), "12.50")]
    #[case(json!("12.345"), "12.35")]
    #[case(json!("$1,234.5"), "1234.50")]
    #[case(json!("-3.10"), "-3.10")]
    #[case(json!("7.25.1"), "7.25")]
    #[case(json!(100), "100.00")]
    fn coerces_money_to_two_places(#[case] raw: Value, #[case] expected: &str) {
        assert_eq!(coerce_money(Some(&raw)), Some(money(expected)));
    }

    #[rstest]
    #[case(json!("free"))]
    #[case(json!(""))]
    #[case(json!("-"))]
    #[case(json!(null))]
    #[case(json!([1]))]
    fn unparseable_money_yields_none(#[case] raw: Value) {
        assert_eq!(coerce_money(Some(&raw)), None);
    }

    #[rstest]
    fn meta_pairs_merge_into_an_object() {
        let raw = json!([
            {"id": 1, "key": "guide", "value": "Ana"},
            {"id": 2, "key": "pickup", "value": {"hotel": "Sol"}},
            {"id": 3, "key": "guide", "value": "Luis"},
            {"id": 4, "value": "orphan"}
        ]);
        assert_eq!(
            normalize_meta(Some(&raw)),
            Some(json!({"guide": "Luis", "pickup": {"hotel": "Sol"}}))
        );
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!({}))]
    #[case(json!("meta"))]
    fn empty_meta_yields_none(#[case] raw: Value) {
        assert_eq!(normalize_meta(Some(&raw)), None);
        assert_eq!(normalize_meta(None), None);
    }

    #[rstest]
    #[case(json!(4), Some(4))]
    #[case(json!("3"), Some(3))]
    #[case(json!({"adult": 2, "child": 1}), Some(3))]
    #[case(json!({"adult": "2", "child": "x", "infant": -1}), Some(2))]
    #[case(json!({"adult": "x"}), None)]
    #[case(json!(-2), None)]
    #[case(json!([2, 1]), None)]
    #[case(json!({"adult": 9.0e18, "child": 9.0e18}), None)]
    fn derives_persons(#[case] raw: Value, #[case] expected: Option<i32>) {
        assert_eq!(derive_persons(Some(&raw)), expected);
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!(1), true)]
    #[case(json!("true"), true)]
    #[case(json!("0"), false)]
    #[case(json!(null), false)]
    fn coerces_loose_booleans(#[case] raw: Value, #[case] expected: bool) {
        assert_eq!(coerce_bool(Some(&raw)), expected);
    }
}
