//! Normalized response envelope
//!
//! Every HTTP response, successful or not, is reduced to the same shape
//! before assertions look at it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FieldPath, StatusCode};
use crate::request::Headers;

/// The response to one scenario's request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers (case-insensitive lookup).
    #[serde(default)]
    pub headers: Headers,
    /// Response body as an untyped structured value.
    ///
    /// JSON bodies are parsed, other text is kept as a JSON string and an
    /// empty body is `null`.
    #[serde(default)]
    pub body: Value,
    /// Round-trip time.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl ResponseEnvelope {
    /// Creates an envelope from an already-decoded body.
    #[must_use]
    pub fn new(status: impl Into<StatusCode>, headers: Headers, body: Value) -> Self {
        Self {
            status: status.into(),
            headers,
            body,
            duration: Duration::ZERO,
        }
    }

    /// Creates an envelope from raw body bytes.
    #[must_use]
    pub fn from_bytes(
        status: impl Into<StatusCode>,
        headers: Headers,
        body: &[u8],
        duration: Duration,
    ) -> Self {
        Self {
            status: status.into(),
            headers,
            body: decode_body(body),
            duration,
        }
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Resolves a field path against the body.
    #[must_use]
    pub fn field(&self, path: &FieldPath) -> Option<&Value> {
        path.lookup(&self.body)
    }

    /// Returns true if the status is 4xx or 5xx.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.status.is_error()
    }
}

/// Decode a body: JSON when it parses, a JSON string otherwise.
#[must_use]
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
