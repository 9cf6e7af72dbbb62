//! Decoded response payloads and the envelope normalization rules.
//!
//! # Design
//! The remote service wraps successes in `{"result": ...}` and logical
//! failures in `{"failed": true, "error": "..."}`, but nothing guarantees
//! it: bodies may be arbitrary JSON or not JSON at all. `Payload` keeps the
//! raw-text case distinct from a JSON string so callers pattern-match
//! instead of probing fields.

use serde_json::{Map, Value};

/// Caller-supplied argument mapping for an endpoint call.
pub type Params = Map<String, Value>;

/// A response body after decoding: structured JSON or opaque text.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Decode a response body, falling back to opaque text when it is not
    /// valid JSON.
    pub fn decode(body: &str) -> Payload {
        match serde_json::from_str(body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body.to_string()),
        }
    }

    /// Borrow the JSON value, if the body decoded as JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Whether the payload is an envelope announcing a logical failure.
    pub(crate) fn failed(&self) -> bool {
        match self {
            Payload::Json(Value::Object(map)) => map.get("failed").is_some_and(truthy),
            _ => false,
        }
    }

    /// The envelope's error message, or the service's generic default.
    pub(crate) fn error_message(&self) -> String {
        if let Payload::Json(Value::Object(map)) = self {
            if let Some(Value::String(message)) = map.get("error") {
                return message.clone();
            }
        }
        "API request failed.".to_string()
    }

    /// Unwrap the envelope: a JSON object's `result` field when present,
    /// anything else unchanged. Objects without a `result` field pass
    /// through whole, which leaves malformed-but-valid envelopes
    /// indistinguishable from bare objects.
    pub(crate) fn unwrap_result(self) -> Payload {
        match self {
            Payload::Json(Value::Object(mut map)) => match map.remove("result") {
                Some(result) => Payload::Json(result),
                None => Payload::Json(Value::Object(map)),
            },
            other => other,
        }
    }
}

/// Truthiness of the `failed` flag: null, `false`, zero, and empty
/// strings/arrays/objects do not announce a failure.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
