//! Concrete request descriptor

use serde::{Deserialize, Serialize};

use super::{Headers, HttpMethod};

/// A fully resolved HTTP request, ready to be sent.
///
/// Produced by the request builder once every template in a scenario has
/// been substituted. The path is relative to the configured base URL unless
/// it is itself an absolute `http(s)://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Path (and query) relative to the base URL.
    pub path: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Headers,
    /// Serialized JSON body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// Creates a descriptor without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the serialized body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns true if the path is already an absolute URL.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with("http://") || self.path.starts_with("https://")
    }

    /// Joins the path onto a base URL the way a browser-less test runner does:
    /// plain concatenation with exactly one slash between the two parts.
    #[must_use]
    pub fn url_on(&self, base_url: &str) -> String {
        if self.is_absolute() {
            return self.path.clone();
        }
        let base = base_url.trim_end_matches('/');
        if self.path.is_empty() {
            base.to_string()
        } else if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }
}

impl std::fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
