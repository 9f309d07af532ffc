//! Read-only navigation of input documents.

use serde_json::Value;

/// Follows `keys` from `root`, indexing objects by key and arrays by
/// position. Returns `None` as soon as a step does not resolve.
pub fn read_path<'a>(root: &'a Value, keys: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for key in keys {
        current = match current {
            Value::Object(map) => map.get(key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// String form of a scalar, used when a value becomes a key.
///
/// Strings are taken verbatim; numbers and booleans use their JSON text.
/// Null, objects and arrays have no key form.
pub fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
