//! Tolerant deserializers for admin-configured values.
//!
//! Shipping settings are edited by hand in the admin dashboard and stored as
//! loosely typed JSON. Numbers may arrive as JSON numbers or numeric strings,
//! and a field that cannot be read is treated as "not configured" rather than
//! failing the whole document.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Parse a decimal from a JSON value, accepting numbers and numeric strings.
///
/// Returns `None` for null, booleans, arrays, objects, empty strings and
/// anything that is not a finite number (`"NaN"`, `"Infinity"`, `"abc"`).
#[must_use]
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s.trim()),
        _ => None,
    }
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Parse a timestamp from an RFC 3339 string or epoch milliseconds.
#[must_use]
pub fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// `deserialize_with` adapter for optional decimals.
///
/// # Errors
///
/// Only fails if the input is not valid JSON; unreadable values become `None`.
pub fn option_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_decimal))
}

/// `deserialize_with` adapter for optional timestamps.
///
/// # Errors
///
/// Only fails if the input is not valid JSON; unreadable values become `None`.
pub fn option_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_datetime))
}

/// `serialize_with` adapter writing optional decimals as JSON numbers.
///
/// # Errors
///
/// Fails if the decimal cannot be represented as an `f64`.
#[allow(clippy::ref_option)] // signature required by serde
pub fn option_decimal_as_number<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.map(|d| (d, d.to_f64())) {
        None => serializer.serialize_none(),
        Some((_, Some(f))) => serializer.serialize_f64(f),
        Some((d, None)) => Err(serde::ser::Error::custom(format!(
            "{d} cannot be represented as a number"
        ))),
    }
}

/// `deserialize_with` adapter for a list of strings; non-string entries are skipped.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// `deserialize_with` adapter for flags stored as booleans, strings or numbers.
///
/// # Errors
///
/// Only fails if the input is not valid JSON.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    })
}
