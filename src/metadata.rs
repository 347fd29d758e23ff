use crate::block::{format_number, Payload};
use serde_json::Value;

/// Render the whitelisted `keys` of a metadata payload as `key: value`
/// pairs, in whitelist order.
///
/// A bare type tag carries no payload and yields an empty string. A
/// payload that is not an object, or has none of the keys, yields
/// `"No metadata"`.
pub fn extract(payload: &Payload, keys: &[String]) -> String {
    let source = match payload {
        Payload::Absent => return String::new(),
        Payload::Present(Value::Object(obj)) => obj,
        Payload::Present(_) => return "No metadata".to_string(),
    };

    let pairs: Vec<String> = keys
        .iter()
        .filter_map(|key| {
            source
                .get(key)
                .map(|value| format!("{}: {}", key, display_value(value)))
        })
        .collect();

    if pairs.is_empty() {
        "No metadata".to_string()
    } else {
        pairs.join(", ")
    }
}

/// Stringify a JSON value the way a template literal would.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
