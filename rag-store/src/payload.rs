//! Conversions between JSON metadata and Qdrant payload values.

use std::collections::HashMap;

use qdrant_client::qdrant::{ListValue, Struct, Value as QValue, value::Kind as K};
use serde_json::{Map, Value};

/// Converts `serde_json::Value` into a Qdrant `Value` (handles arrays/objects).
pub fn json_to_qvalue(v: Value) -> QValue {
    let kind = match v {
        Value::Null => None,
        Value::Bool(b) => Some(K::BoolValue(b)),
        Value::Number(n) => Some(if let Some(i) = n.as_i64() {
            K::IntegerValue(i)
        } else if let Some(f) = n.as_f64() {
            K::DoubleValue(f)
        } else {
            K::StringValue(n.to_string())
        }),
        Value::String(s) => Some(K::StringValue(s)),
        Value::Array(arr) => Some(K::ListValue(ListValue {
            values: arr.into_iter().map(json_to_qvalue).collect(),
        })),
        Value::Object(map) => Some(K::StructValue(Struct {
            fields: map.into_iter().map(|(k, v)| (k, json_to_qvalue(v))).collect(),
        })),
    };
    QValue { kind }
}

pub fn qvalue_to_json(v: QValue) -> Value {
    match v.kind {
        None | Some(K::NullValue(_)) => Value::Null,
        Some(K::BoolValue(b)) => Value::Bool(b),
        Some(K::IntegerValue(i)) => Value::from(i),
        Some(K::DoubleValue(f)) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(K::StringValue(s)) => Value::String(s),
        Some(K::ListValue(l)) => Value::Array(l.values.into_iter().map(qvalue_to_json).collect()),
        Some(K::StructValue(s)) => Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, qvalue_to_json(v)))
                .collect(),
        ),
    }
}

/// Point payload: `content` plus every metadata key at the top level.
pub fn to_payload(content: &str, metadata: &Map<String, Value>) -> HashMap<String, QValue> {
    let mut p = HashMap::with_capacity(metadata.len() + 1);
    for (k, v) in metadata {
        p.insert(k.clone(), json_to_qvalue(v.clone()));
    }
    p.insert("content".into(), json_to_qvalue(Value::String(content.to_string())));
    p
}

/// Inverse of [`to_payload`]: `(content, metadata)`.
pub fn from_payload(mut p: HashMap<String, QValue>) -> (String, Map<String, Value>) {
    let content = p
        .remove("content")
        .map(qvalue_to_json)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    let metadata = p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect();
    (content, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_round_trip_keeps_nested_values() {
        let meta = json!({
            "source_type": "api_spec",
            "complexity": "low",
            "params": 3,
            "tags": ["a", "b"],
            "extra": {"ok": true}
        });
        let meta = meta.as_object().unwrap().clone();
        let (content, back) = from_payload(to_payload("body", &meta));
        assert_eq!(content, "body");
        assert_eq!(back, meta);
    }
}
