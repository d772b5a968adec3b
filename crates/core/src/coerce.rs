//! Write-time coercion of values to a column's declared type.

use crate::types::DataType;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Textual date layouts accepted besides RFC 3339, tried in order.
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Coerces a non-null value to `target`.
///
/// Returns `None` when the value has no representation in the target type.
/// Null is passed through unchanged; nullability is the caller's concern.
pub fn coerce(value: Value, target: DataType) -> Option<Value> {
    if value.is_null() || value.data_type() == Some(target) {
        return Some(value);
    }
    match target {
        DataType::Number => to_number(&value).map(Value::Number),
        DataType::Date => to_date(&value).map(Value::Date),
        DataType::String => Some(Value::String(value.to_string())),
        DataType::Boolean => Some(Value::Boolean(value.is_truthy())),
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
        }
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Date(_) => value.timestamp_millis().map(|ms| ms as f64),
        Value::Null => None,
    }
}

fn to_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Number(n) if n.is_finite() => Value::date_from_millis(*n as i64)?.as_date(),
        Value::String(s) => parse_date(s.trim()),
        _ => None,
    }
}

/// Parses the textual date forms accepted by `date` columns.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
