//! Scenario definitions.
//!
//! A scenario is one declarative HTTP request plus the expectations checked
//! against its response and the values it contributes to later scenarios.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expectation::Expectation;
use crate::request::HttpMethod;
use crate::response::FieldPath;

/// One request, its expectations and its extraction rules.
///
/// Path, header values, body and expected values may contain `${var}`
/// references that are resolved against the run context when the scenario
/// executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name, used in reports.
    pub name: String,
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
    /// Path template relative to the base URL.
    pub path: String,
    /// Header templates.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Body template, serialized as JSON when sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Expectations, evaluated in order.
    #[serde(default, rename = "expect")]
    pub expectations: Vec<Expectation>,
    /// Whether a 4xx/5xx response aborts the scenario.
    #[serde(default = "default_fail_on_status_code")]
    pub fail_on_status_code: bool,
    /// Values copied from the response into the run context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extract: Vec<ExtractionRule>,
}

const fn default_fail_on_status_code() -> bool {
    true
}

impl Scenario {
    /// Creates a scenario with no headers, body or expectations.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
            expectations: Vec::new(),
            fail_on_status_code: true,
            extract: Vec::new(),
        }
    }

    /// Creates a GET scenario.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    /// Adds a header template (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body template (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds an expectation (builder pattern).
    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Lets 4xx/5xx responses through to the expectations.
    #[must_use]
    pub const fn allow_error_status(mut self) -> Self {
        self.fail_on_status_code = false;
        self
    }

    /// Adds an extraction rule (builder pattern).
    #[must_use]
    pub fn extract(mut self, rule: ExtractionRule) -> Self {
        self.extract.push(rule);
        self
    }

    /// Variable names this scenario writes into the run context.
    pub fn produces(&self) -> impl Iterator<Item = &str> {
        self.extract.iter().map(ExtractionRule::target)
    }
}

/// Instruction to copy a value from a response into the run context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum ExtractionRule {
    /// Copy a body field.
    Body {
        /// Path into the response body.
        path: FieldPath,
        /// Run-context variable to bind.
        into: String,
    },
    /// Copy a response header value (as a string).
    Header {
        /// Header name (case-insensitive).
        name: String,
        /// Run-context variable to bind.
        into: String,
    },
}

impl ExtractionRule {
    /// Creates a body extraction rule.
    #[must_use]
    pub fn body(path: FieldPath, into: impl Into<String>) -> Self {
        Self::Body {
            path,
            into: into.into(),
        }
    }

    /// Creates a header extraction rule.
    #[must_use]
    pub fn header(name: impl Into<String>, into: impl Into<String>) -> Self {
        Self::Header {
            name: name.into(),
            into: into.into(),
        }
    }

    /// The run-context variable this rule binds.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Body { into, .. } | Self::Header { into, .. } => into,
        }
    }

    /// Get a human-readable description of this rule.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Body { path, into } => format!("extract body.{path} into {into}"),
            Self::Header { name, into } => format!("extract header '{name}' into {into}"),
        }
    }
}
