//! Value type definitions for Tabula tables.
//!
//! This module defines the `Value` enum which represents anything that can be
//! stored in a row cell.

use crate::types::DataType;
use chrono::{DateTime, NaiveDateTime, Utc};
use core::cmp::Ordering;
use core::fmt;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A value that can be stored in a row cell.
///
/// Equality is strict: values of different variants are never equal, and
/// `Number(NaN)` is not equal to itself.
///
/// Serializes as a plain scalar: null, number, string or boolean, with dates
/// as ISO-8601 strings. Deserialized strings stay strings; a date column
/// coerces them back on write.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Null value (the only null/empty marker)
    Null,
    /// 64-bit floating point number
    Number(f64),
    /// UTF-8 string
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Date and time, interpreted as UTC for timestamps
    Date(NaiveDateTime),
}

impl Value {
    /// Returns the data type of this value, or None if it's Null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Number(_) => Some(DataType::Number),
            Value::String(_) => Some(DataType::String),
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Date(_) => Some(DataType::Date),
        }
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the boolean if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the date if this is a Date, None otherwise.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Milliseconds since the Unix epoch, if this is a Date.
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.as_date().map(|d| d.and_utc().timestamp_millis())
    }

    /// Truthiness used by boolean coercion.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Date(_) => true,
        }
    }

    /// Relational comparison between two values.
    ///
    /// Numbers compare numerically, dates by timestamp (numbers and dates
    /// compare with each other through the timestamp), strings
    /// lexicographically and booleans with `false < true`. Any other pairing,
    /// Null included, is not comparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Number(a), Value::Date(_)) => {
                a.partial_cmp(&(other.timestamp_millis()? as f64))
            }
            (Value::Date(_), Value::Number(b)) => {
                (self.timestamp_millis()? as f64).partial_cmp(b)
            }
            _ => None,
        }
    }

    /// Total ordering used when sorting heterogeneous values.
    ///
    /// Falls back to a fixed order between variants when `compare` has no
    /// answer; NaN sorts after every other number.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        if let (Value::Number(a), Value::Number(b)) = (self, other) {
            return match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            };
        }
        self.compare(other)
            .unwrap_or_else(|| self.type_order().cmp(&other.type_order()))
    }

    /// Returns a type ordering value for comparing different variants.
    fn type_order(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Number(_) => 2,
            Value::Date(_) => 3,
            Value::String(_) => 4,
        }
    }

    /// Builds a date value from milliseconds since the Unix epoch.
    pub fn date_from_millis(millis: i64) -> Option<Value> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(|d| Value::Date(d.naive_utc()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // -0 prints as 0
            Value::Number(n) if *n == 0.0 => f.write_str("0"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Date(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Date(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("null, a number, a string or a boolean")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
                Value::deserialize(deserializer)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Boolean(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                Ok(Value::Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Number(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::String(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::String(v))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_value_type_check() {
        assert_eq!(Value::Number(1.0).data_type(), Some(DataType::Number));
        assert_eq!(Value::Null.data_type(), None);
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_strict_equality() {
        assert_eq!(Value::from(7), Value::Number(7.0));
        assert_ne!(Value::from(7), Value::from("7"));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn test_compare() {
        assert_eq!(Value::from(1).compare(&Value::from(2)), Some(Ordering::Less));
        assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::from(false).compare(&Value::from(true)), Some(Ordering::Less));
        assert_eq!(Value::Null.compare(&Value::from(1)), None);
        assert_eq!(Value::from("1").compare(&Value::from(1)), None);

        let d = Value::Date(date(1970, 1, 2));
        assert_eq!(d.compare(&Value::from(86_400_000)), Some(Ordering::Equal));
        assert_eq!(Value::from(0).compare(&d), Some(Ordering::Less));
    }

    #[test]
    fn test_sort_cmp_is_total() {
        assert_eq!(Value::Number(f64::NAN).sort_cmp(&Value::from(1)), Ordering::Greater);
        assert_eq!(Value::Null.sort_cmp(&Value::from(1)), Ordering::Less);
        assert_eq!(Value::from(1).sort_cmp(&Value::from("a")), Ordering::Less);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Date(date(2024, 3, 1)).to_string(), "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::from(1).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(Value::from("false").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn test_date_from_millis() {
        let v = Value::date_from_millis(86_400_000).unwrap();
        assert_eq!(v, Value::Date(date(1970, 1, 2)));
        assert_eq!(v.timestamp_millis(), Some(86_400_000));
    }

    #[test]
    fn test_value_from_option() {
        let v: Value = Some(100i64).into();
        assert_eq!(v.as_number(), Some(100.0));

        let v: Value = None::<i32>.into();
        assert!(v.is_null());
    }

    #[test]
    fn test_serde_plain_scalars() {
        assert_eq!(serde_json::to_string(&Value::from(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&Value::from(2.5)).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::from("a")).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&Value::from(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&Value::Date(date(2024, 3, 1))).unwrap(),
            "\"2024-03-01T00:00:00.000Z\""
        );

        let back: Value = serde_json::from_str("7").unwrap();
        assert_eq!(back, Value::Number(7.0));
        let back: Value = serde_json::from_str("null").unwrap();
        assert_eq!(back, Value::Null);
        let back: Value = serde_json::from_str("-1.25").unwrap();
        assert_eq!(back, Value::Number(-1.25));
        assert!(serde_json::from_str::<Value>("[1]").is_err());
    }
}
