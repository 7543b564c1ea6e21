//! Assertion engine
//!
//! Evaluates declarative expectations against a response envelope.

use regex::Regex;
use serde_json::Value;
use sonde_domain::{Expectation, ExpectationResult, FieldPath, ResponseEnvelope, RunContext};

use crate::template::TemplateResolver;

/// Evaluates expectations in order, never stopping at the first failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertionEngine;

impl AssertionEngine {
    /// Evaluates every expectation against the response.
    ///
    /// Expected values of `body_field_equals` are templates resolved against
    /// the context first; an unresolved one fails only that expectation.
    #[must_use]
    pub fn evaluate(
        scenario: &str,
        expectations: &[Expectation],
        response: &ResponseEnvelope,
        context: &RunContext,
    ) -> Vec<ExpectationResult> {
        expectations
            .iter()
            .map(|expectation| Self::check(scenario, expectation, response, context))
            .collect()
    }

    /// Evaluates a single expectation.
    #[must_use]
    pub fn check(
        scenario: &str,
        expectation: &Expectation,
        response: &ResponseEnvelope,
        context: &RunContext,
    ) -> ExpectationResult {
        let description = expectation.description();
        match expectation {
            Expectation::StatusEquals { status } => {
                check_status(scenario, description, response, *status)
            }
            Expectation::HeaderContains { name, substring } => {
                check_header_contains(scenario, description, response, name, substring)
            }
            Expectation::HeaderMatches { name, pattern } => {
                check_header_matches(scenario, description, response, name, pattern)
            }
            Expectation::BodyFieldEquals { path, value } => {
                check_field_equals(scenario, description, response, path, value, context)
            }
            Expectation::BodyLengthEquals { length } => {
                check_length(scenario, description, response, *length)
            }
            Expectation::BodyFieldIsUndefined { path } => {
                check_undefined(scenario, description, response, path)
            }
        }
    }
}

fn check_status(
    scenario: &str,
    description: String,
    response: &ResponseEnvelope,
    expected: u16,
) -> ExpectationResult {
    let actual = response.status.as_u16();
    let result = if actual == expected {
        ExpectationResult::pass(scenario, description)
    } else {
        ExpectationResult::fail(
            scenario,
            description,
            format!("expected status {expected}, got {}", response.status),
        )
    };
    result
        .with_expected(expected)
        .with_actual(Some(Value::from(actual)))
}

fn check_header_contains(
    scenario: &str,
    description: String,
    response: &ResponseEnvelope,
    name: &str,
    substring: &str,
) -> ExpectationResult {
    let Some(actual) = response.header(name) else {
        return ExpectationResult::fail(scenario, description, format!("header '{name}' not found"))
            .with_expected(substring);
    };

    let result = if actual.contains(substring) {
        ExpectationResult::pass(scenario, description)
    } else {
        ExpectationResult::fail(
            scenario,
            description,
            format!("header '{name}' value '{actual}' does not contain '{substring}'"),
        )
    };
    result
        .with_expected(substring)
        .with_actual(Some(Value::from(actual)))
}

fn check_header_matches(
    scenario: &str,
    description: String,
    response: &ResponseEnvelope,
    name: &str,
    pattern: &str,
) -> ExpectationResult {
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            return ExpectationResult::fail(
                scenario,
                description,
                format!("invalid regex pattern '{pattern}': {e}"),
            );
        }
    };

    let Some(actual) = response.header(name) else {
        return ExpectationResult::fail(scenario, description, format!("header '{name}' not found"))
            .with_expected(pattern);
    };

    let result = if regex.is_match(actual) {
        ExpectationResult::pass(scenario, description)
    } else {
        ExpectationResult::fail(
            scenario,
            description,
            format!("header '{name}' value '{actual}' does not match pattern '{pattern}'"),
        )
    };
    result
        .with_expected(pattern)
        .with_actual(Some(Value::from(actual)))
}

fn check_field_equals(
    scenario: &str,
    description: String,
    response: &ResponseEnvelope,
    path: &FieldPath,
    template: &Value,
    context: &RunContext,
) -> ExpectationResult {
    let expected = TemplateResolver::new(context).resolve_value(template);
    if !expected.is_complete() {
        return ExpectationResult::fail(
            scenario,
            description,
            format!(
                "expected value references unresolved variable '{}'",
                expected.unresolved.join("', '")
            ),
        );
    }
    let expected = expected.value;
    let actual = response.field(path).cloned();

    let result = match &actual {
        Some(value) if values_equal(value, &expected) => {
            ExpectationResult::pass(scenario, description)
        }
        Some(value) if json_type(value) != json_type(&expected) => ExpectationResult::fail(
            scenario,
            description,
            format!(
                "body.{path} type mismatch: expected {} {expected}, got {} {value}",
                json_type(&expected),
                json_type(value)
            ),
        ),
        Some(value) => ExpectationResult::fail(
            scenario,
            description,
            format!("body.{path} value mismatch: expected {expected}, got {value}"),
        ),
        None => ExpectationResult::fail(scenario, description, format!("body.{path} not found")),
    };
    result.with_expected(expected).with_actual(actual)
}

fn check_length(
    scenario: &str,
    description: String,
    response: &ResponseEnvelope,
    expected: usize,
) -> ExpectationResult {
    let actual = match &response.body {
        Value::Array(items) => items.len(),
        Value::String(text) => text.chars().count(),
        other => {
            return ExpectationResult::fail(
                scenario,
                description,
                format!("body is {} {other}, which has no length", json_type(other)),
            )
            .with_expected(expected);
        }
    };

    let result = if actual == expected {
        ExpectationResult::pass(scenario, description)
    } else {
        ExpectationResult::fail(
            scenario,
            description,
            format!("expected body length {expected}, got {actual}"),
        )
    };
    result
        .with_expected(expected)
        .with_actual(Some(Value::from(actual)))
}

fn check_undefined(
    scenario: &str,
    description: String,
    response: &ResponseEnvelope,
    path: &FieldPath,
) -> ExpectationResult {
    match response.field(path) {
        None => ExpectationResult::pass(scenario, description),
        Some(value) => ExpectationResult::fail(
            scenario,
            description,
            format!("body.{path} is present with value {value}"),
        )
        .with_actual(Some(value.clone())),
    }
}

/// Deep equality with strict types; numbers compare by numeric value so
/// `55` equals `55.0`, but never a string `"55"`.
#[allow(clippy::float_cmp)]
fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (a.as_u64(), b.as_u64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64().zip(b.as_f64()).is_some_and(|(a, b)| a == b),
            },
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => actual == expected,
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
