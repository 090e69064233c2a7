//! Lenient readers for loosely-typed API fields.
//!
//! The 3decision API is inconsistent about scalar types (ids arrive as numbers
//! or numeric strings, codes as strings or numbers) and about key casing
//! between endpoints. These helpers turn a `serde_json::Value` into the typed
//! scalar or `None`; they never fail.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Read a value as a non-empty string. Numbers and booleans are stringified.
#[must_use]
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a value as an integer id. Accepts integers, integral floats and
/// numeric strings.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a value as a float. Accepts numbers and numeric strings.
#[must_use]
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First field among `keys` that reads as a non-empty string.
#[must_use]
pub fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(value_as_string)
}

/// First field among `keys` that reads as an integer id.
#[must_use]
pub fn first_i64(map: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find_map(value_as_i64)
}

/// `deserialize_with` adapter for `Option<String>` fields that may arrive as
/// numbers.
///
/// # Errors
///
/// Only fails when the input is not valid JSON for a `Value`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_string))
}

/// `deserialize_with` adapter for `Option<i64>` fields that may arrive as
/// strings.
///
/// # Errors
///
/// Only fails when the input is not valid JSON for a `Value`.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}

/// `deserialize_with` adapter for `Option<f64>` fields that may arrive as
/// strings.
///
/// # Errors
///
/// Only fails when the input is not valid JSON for a `Value`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_accept_numbers_and_strings() {
        assert_eq!(value_as_i64(&json!(101)), Some(101));
        assert_eq!(value_as_i64(&json!("101")), Some(101));
        assert_eq!(value_as_i64(&json!(101.0)), Some(101));
        assert_eq!(value_as_i64(&json!(101.5)), None);
        assert_eq!(value_as_i64(&json!(null)), None);
    }

    #[test]
    fn strings_skip_blank_values() {
        assert_eq!(value_as_string(&json!("1abc")), Some("1abc".into()));
        assert_eq!(value_as_string(&json!(42)), Some("42".into()));
        assert_eq!(value_as_string(&json!("  ")), None);
        assert_eq!(value_as_string(&json!([1])), None);
    }

    #[test]
    fn first_string_prefers_earlier_keys() {
        let map = json!({"EXTERNAL_CODE": "1ABC", "external_code": "1abc"});
        let map = map.as_object().unwrap();
        assert_eq!(
            first_string(map, &["EXTERNAL_CODE", "external_code"]),
            Some("1ABC".into())
        );
        assert_eq!(
            first_string(map, &["missing", "external_code"]),
            Some("1abc".into())
        );
    }

    #[test]
    fn first_string_skips_empty_candidates() {
        let map = json!({"owner": "", "created_by": "alice"});
        let map = map.as_object().unwrap();
        assert_eq!(
            first_string(map, &["owner", "created_by"]),
            Some("alice".into())
        );
    }
}
