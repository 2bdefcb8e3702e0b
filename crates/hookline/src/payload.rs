//! Reply payloads received from the upstream workflow service
//!
//! The webhook has no fixed response schema. A reply is kept as either raw
//! text or a structured JSON value; deciding what that value *looks like*
//! (table, markdown, plain text) is left to the renderer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An untyped reply from the upstream service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyPayload {
    /// A bare string reply (possibly containing JSON or markdown text)
    Text(String),
    /// Any non-string JSON value
    Structured(Value),
}

impl ReplyPayload {
    /// Wrap a JSON value, keeping strings as text
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => ReplyPayload::Text(s),
            other => ReplyPayload::Structured(other),
        }
    }

    /// Build a payload from a raw HTTP response body.
    ///
    /// JSON bodies are parsed, anything else is kept as text. An empty body,
    /// `null` or an empty string is replaced with `placeholder`.
    pub fn from_body(body: &[u8], placeholder: &str) -> Self {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return ReplyPayload::Text(placeholder.to_string());
        }

        let payload = match serde_json::from_slice::<Value>(body) {
            Ok(value) => ReplyPayload::from_value(value),
            Err(_) => ReplyPayload::Text(String::from_utf8_lossy(body).into_owned()),
        };

        if payload.is_empty() {
            ReplyPayload::Text(placeholder.to_string())
        } else {
            payload
        }
    }

    /// True for `null` and the empty string
    pub fn is_empty(&self) -> bool {
        match self {
            ReplyPayload::Text(s) => s.is_empty(),
            ReplyPayload::Structured(Value::Null) => true,
            ReplyPayload::Structured(_) => false,
        }
    }

    /// String form used for shape sniffing and the message log
    pub fn to_text(&self) -> String {
        match self {
            ReplyPayload::Text(s) => s.clone(),
            ReplyPayload::Structured(Value::String(s)) => s.clone(),
            ReplyPayload::Structured(value) => value.to_string(),
        }
    }

    /// Convert back into a JSON value for relaying over HTTP
    pub fn into_value(self) -> Value {
        match self {
            ReplyPayload::Text(s) => Value::String(s),
            ReplyPayload::Structured(value) => value,
        }
    }
}

impl From<&str> for ReplyPayload {
    fn from(s: &str) -> Self {
        ReplyPayload::Text(s.to_string())
    }
}

impl From<String> for ReplyPayload {
    fn from(s: String) -> Self {
        ReplyPayload::Text(s)
    }
}

impl From<Value> for ReplyPayload {
    fn from(value: Value) -> Self {
        ReplyPayload::from_value(value)
    }
}
