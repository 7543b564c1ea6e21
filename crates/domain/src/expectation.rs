//! Declarative expectations and their recorded outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::response::FieldPath;

/// An expectation to evaluate against a response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Status code equals a value.
    StatusEquals {
        /// Expected status code.
        status: u16,
    },
    /// Header exists and its value contains a substring.
    HeaderContains {
        /// Header name (case-insensitive).
        name: String,
        /// Substring to search for.
        substring: String,
    },
    /// Header value matches a regular expression.
    HeaderMatches {
        /// Header name (case-insensitive).
        name: String,
        /// Regex pattern.
        pattern: String,
    },
    /// Body field equals a value, with strict JSON typing.
    ///
    /// The value may be a template (`"${post.id}"`) resolved against the run
    /// context before comparison.
    BodyFieldEquals {
        /// Path into the body.
        path: FieldPath,
        /// Expected value.
        value: Value,
    },
    /// Body (an array or string) has exactly this length.
    BodyLengthEquals {
        /// Expected length.
        length: usize,
    },
    /// Body field is absent.
    BodyFieldIsUndefined {
        /// Path into the body.
        path: FieldPath,
    },
}

impl Expectation {
    /// Creates a status expectation.
    #[must_use]
    pub const fn status_equals(status: u16) -> Self {
        Self::StatusEquals { status }
    }

    /// Creates a header-contains expectation.
    #[must_use]
    pub fn header_contains(name: impl Into<String>, substring: impl Into<String>) -> Self {
        Self::HeaderContains {
            name: name.into(),
            substring: substring.into(),
        }
    }

    /// Creates a body field equality expectation.
    #[must_use]
    pub fn body_field_equals(path: FieldPath, value: impl Into<Value>) -> Self {
        Self::BodyFieldEquals {
            path,
            value: value.into(),
        }
    }

    /// Creates a body length expectation.
    #[must_use]
    pub const fn body_length_equals(length: usize) -> Self {
        Self::BodyLengthEquals { length }
    }

    /// Creates a body-field-is-undefined expectation.
    #[must_use]
    pub const fn body_field_is_undefined(path: FieldPath) -> Self {
        Self::BodyFieldIsUndefined { path }
    }

    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusEquals { status } => format!("status equals {status}"),
            Self::HeaderContains { name, substring } => {
                format!("header '{name}' contains '{substring}'")
            }
            Self::HeaderMatches { name, pattern } => format!("header '{name}' matches /{pattern}/"),
            Self::BodyFieldEquals { path, value } => format!("body.{path} equals {value}"),
            Self::BodyLengthEquals { length } => format!("body length equals {length}"),
            Self::BodyFieldIsUndefined { path } => format!("body.{path} is undefined"),
        }
    }
}

/// Recorded outcome of one expectation (or of a scenario-level failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationResult {
    /// Scenario that produced this result.
    pub scenario: String,
    /// Human-readable description of what was checked.
    pub description: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Expected value, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    /// Actual value found; `None` means absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExpectationResult {
    /// Create a passed result.
    #[must_use]
    pub fn pass(scenario: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            description: description.into(),
            passed: true,
            expected: None,
            actual: None,
            message: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(
        scenario: impl Into<String>,
        description: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            description: description.into(),
            passed: false,
            expected: None,
            actual: None,
            message: Some(message.into()),
        }
    }

    /// Attach the expected value (builder pattern).
    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Attach the actual value (builder pattern).
    #[must_use]
    pub fn with_actual(mut self, actual: Option<Value>) -> Self {
        self.actual = actual;
        self
    }
}
