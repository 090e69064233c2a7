//! Boundary adapters for list-or-envelope response bodies.
//!
//! Several endpoints return either a bare JSON array or an object wrapping the
//! array under one of a few keys. Each endpoint module names its own keys and
//! calls [`entries`]; nothing past this point sees the raw shape.

use serde_json::Value;
use tdec_core::serde_helpers::value_as_i64;

/// The entry list of `body`: the array itself, or the first array found under
/// `envelope_keys`. `None` for any other shape.
pub(crate) fn entries(body: Value, envelope_keys: &[&str]) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => envelope_keys.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }),
        _ => None,
    }
}

/// Integer ids from a JSON array, skipping entries that are not ids.
pub(crate) fn id_list(value: &Value) -> Option<Vec<i64>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(value_as_i64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_list() {
        let items = entries(json!([{"a": 1}, {"a": 2}]), &["projects"]).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn envelope_keys_in_order() {
        let body = json!({"results": [1], "projects": [1, 2]});
        assert_eq!(entries(body.clone(), &["projects", "results"]).unwrap().len(), 2);
        assert_eq!(entries(body, &["results", "projects"]).unwrap().len(), 1);
    }

    #[test]
    fn unknown_shape() {
        assert!(entries(json!({"items": []}), &["projects", "results"]).is_none());
        assert!(entries(json!("x"), &["projects"]).is_none());
        assert!(entries(json!({"projects": "nope"}), &["projects"]).is_none());
    }

    #[test]
    fn ids_skip_garbage() {
        assert_eq!(id_list(&json!([101, "102", null, 1.5])), Some(vec![101, 102]));
        assert_eq!(id_list(&json!({"x": 1})), None);
    }
}
