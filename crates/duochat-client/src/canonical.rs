//! Deterministic JSON encoding for outgoing request bodies.
//!
//! Two logically identical requests must serialize byte-identically so that
//! downstream request-fingerprint caching sees them as the same request.
//! Object keys are sorted recursively; array order is preserved.

use serde::Serialize;
use serde_json::Value;

use crate::errors::ClientError;

/// Encodes any serializable value canonically.
pub fn canonical_body<T: Serialize>(value: &T) -> Result<String, ClientError> {
    let value =
        serde_json::to_value(value).map_err(|e| ClientError::Serialization(e.to_string()))?;
    Ok(to_canonical_string(&value))
}

/// Renders a JSON value with recursively sorted object keys and no
/// insignificant whitespace.
pub fn to_canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_value(out, &map[key.as_str()]);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn construction_order_does_not_change_encoding() {
        let mut first = serde_json::Map::new();
        first.insert("message".into(), json!("hi"));
        first.insert("bot_id".into(), json!(2));

        let mut second = serde_json::Map::new();
        second.insert("bot_id".into(), json!(2));
        second.insert("message".into(), json!("hi"));

        let a = to_canonical_string(&Value::Object(first));
        let b = to_canonical_string(&Value::Object(second));
        assert_eq!(a, b);
        assert_eq!(a, r#"{"bot_id":2,"message":"hi"}"#);
    }

    #[test]
    fn nested_objects_are_sorted_and_arrays_keep_order() {
        let value = json!({
            "z": {"b": 1, "a": [3, 1, 2]},
            "a": true,
        });
        assert_eq!(
            to_canonical_string(&value),
            r#"{"a":true,"z":{"a":[3,1,2],"b":1}}"#
        );
    }

    #[test]
    fn strings_are_escaped_like_plain_json() {
        let value = json!({"k": "a\"b\n"});
        assert_eq!(to_canonical_string(&value), "{\"k\":\"a\\\"b\\n\"}");
    }

    #[test]
    fn canonical_body_encodes_serializable_types() {
        #[derive(serde::Serialize)]
        struct Req {
            message: String,
            bot_id: u8,
        }
        let body = canonical_body(&Req {
            message: "hi".into(),
            bot_id: 1,
        })
        .expect("encode");
        assert_eq!(body, r#"{"bot_id":1,"message":"hi"}"#);
    }
}
