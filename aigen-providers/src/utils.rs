//! Common utilities for request conversion

use serde::Serializer;
use serde_json::{Map, Value};

/// Encode an `f32` through its shortest decimal form
///
/// `json!(0.7_f32)` would widen to `0.699999988079071`.
pub fn json_number(value: f32) -> Value {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

/// `serialize_with` adapter applying [`json_number`] to an optional `f32`
pub fn serialize_short_f32<S: Serializer>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error> {
    match value.map(json_number) {
        Some(Value::Number(n)) => serializer.serialize_some(&n),
        _ => serializer.serialize_none(),
    }
}

/// Merge passthrough options into a request body, leaving `reserved` keys
/// untouched
pub fn merge_additional(body: &mut Value, additional: &Map<String, Value>, reserved: &[&str]) {
    if let Some(obj) = body.as_object_mut() {
        for (key, value) in additional {
            if reserved.contains(&key.as_str()) {
                tracing::debug!(key = %key, "ignoring reserved passthrough option");
                continue;
            }
            obj.insert(key.clone(), value.clone());
        }
    }
}
