//! Unwrapping of API gateway response envelopes.
//!
//! Serverless telemetry endpoints commonly answer with the handler's raw
//! return value: `{"statusCode": 200, "body": "<json string>"}`. Others
//! return the records directly, or nest them under a `data` key. All three
//! shapes are accepted here.

use serde_json::Value;

use plantwatch_types::TelemetryFeed;

use crate::AdapterError;

/// Decode a feed from a response body.
pub fn decode_feed(bytes: &[u8]) -> Result<TelemetryFeed, AdapterError> {
    let value: Value = serde_json::from_slice(bytes)?;
    feed_from_value(value)
}

/// Extract a feed from an already-parsed JSON value.
pub fn feed_from_value(value: Value) -> Result<TelemetryFeed, AdapterError> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => {
            if let Some(code) = map.get("statusCode").and_then(Value::as_u64) {
                if code != 200 {
                    return Err(AdapterError::Http(format!("API returned status {}", code)));
                }
            }

            if let Some(body) = map.remove("body") {
                return match body {
                    // body is itself serialized JSON
                    Value::String(inner) => {
                        let inner: Value = serde_json::from_str(&inner)?;
                        feed_from_value(inner)
                    }
                    other => feed_from_value(other),
                };
            }

            match map.remove("data") {
                Some(data @ Value::Array(_)) => Ok(serde_json::from_value(data)?),
                _ => Err(AdapterError::Parse(
                    "unexpected response structure".to_string(),
                )),
            }
        }
        other => Err(AdapterError::Parse(format!(
            "expected array or object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{"subplant":"A","asset_id":"X1","node_id":"N1","asset_status":"Healthy","node_status":"Critical"}"#;

    #[test]
    fn test_bare_array() {
        let body = format!("[{}]", RECORD);
        let feed = decode_feed(body.as_bytes()).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].node_status, "Critical");
    }

    #[test]
    fn test_string_body_envelope() {
        let inner = format!("[{}]", RECORD);
        let envelope = serde_json::json!({ "statusCode": 200, "body": inner });
        let feed = feed_from_value(envelope).unwrap();
        assert_eq!(feed[0].asset_id, "X1");
    }

    #[test]
    fn test_array_body_envelope() {
        let record: Value = serde_json::from_str(RECORD).unwrap();
        let envelope = serde_json::json!({ "body": [record] });
        assert_eq!(feed_from_value(envelope).unwrap().len(), 1);
    }

    #[test]
    fn test_nested_data_key() {
        let inner = format!(r#"{{"data":[{}],"rows_returned":1}}"#, RECORD);
        let envelope = serde_json::json!({ "statusCode": 200, "body": inner });
        assert_eq!(feed_from_value(envelope).unwrap().len(), 1);
    }

    #[test]
    fn test_non_200_envelope() {
        let envelope = serde_json::json!({ "statusCode": 502, "body": "[]" });
        let err = feed_from_value(envelope).unwrap_err();
        assert!(matches!(err, AdapterError::Http(msg) if msg.contains("502")));
    }

    #[test]
    fn test_unexpected_shapes() {
        assert!(matches!(
            feed_from_value(serde_json::json!({ "rows": [] })),
            Err(AdapterError::Parse(_))
        ));
        assert!(matches!(
            feed_from_value(serde_json::json!(42)),
            Err(AdapterError::Parse(_))
        ));
        assert!(matches!(decode_feed(b"not json"), Err(AdapterError::Parse(_))));
    }

    #[test]
    fn test_empty_feed_is_ok() {
        assert!(decode_feed(b"[]").unwrap().is_empty());
    }
}
