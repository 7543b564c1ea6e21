//! Static suite check
//!
//! Walks a suite without sending anything and reports problems that would
//! make scenarios abort or fail regardless of the server's answers.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde_json::Value;
use sonde_domain::{Expectation, RunContext, Scenario, Suite, validate_variable_name};

use crate::template::parse_variables;

/// A problem found by the static check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIssue {
    /// Scenario the problem belongs to.
    pub scenario: String,
    /// What is wrong.
    pub kind: CheckIssueKind,
}

/// Categories of static problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIssueKind {
    /// No seed and no earlier extraction binds this name.
    UnresolvedReference {
        /// Referenced variable.
        name: String,
        /// Where the reference appears, e.g. `path` or `header 'Authorization'`.
        location: String,
    },
    /// A `header_matches` pattern does not compile.
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// Regex compiler message.
        message: String,
    },
    /// An extraction target is not a valid variable name.
    InvalidTarget {
        /// The target as written.
        name: String,
    },
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.scenario)?;
        match &self.kind {
            CheckIssueKind::UnresolvedReference { name, location } => {
                write!(f, "'${{{name}}}' in {location} is never bound")
            }
            CheckIssueKind::InvalidPattern { pattern, message } => {
                write!(f, "invalid header pattern '{pattern}': {message}")
            }
            CheckIssueKind::InvalidTarget { name } => {
                write!(f, "invalid extraction target '{name}'")
            }
        }
    }
}

/// Static checker for suites.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuiteCheck;

impl SuiteCheck {
    /// Checks a suite, with seeds already merged, in execution order.
    #[must_use]
    pub fn run(suite: &Suite) -> Vec<CheckIssue> {
        let seeds = suite.initial_context();
        let mut produced = BTreeSet::new();
        let mut issues = Vec::new();

        for scenario in &suite.scenarios {
            let bound = Bound {
                seeds: &seeds,
                produced: &produced,
            };
            check_scenario(scenario, &bound, &mut issues);
            produced.extend(scenario.produces().map(str::to_string));
        }

        issues
    }
}

/// Names available when a scenario starts.
struct Bound<'a> {
    seeds: &'a RunContext,
    produced: &'a BTreeSet<String>,
}

impl Bound<'_> {
    /// Extracted values are unknown statically, so any member of one counts.
    fn contains(&self, name: &str) -> bool {
        self.seeds.contains(name)
            || self.produced.contains(name)
            || self
                .produced
                .iter()
                .any(|p| name.strip_prefix(p.as_str()).is_some_and(|rest| rest.starts_with('.')))
    }
}

fn check_scenario(scenario: &Scenario, bound: &Bound<'_>, issues: &mut Vec<CheckIssue>) {
    let mut report = |kind| {
        issues.push(CheckIssue {
            scenario: scenario.name.clone(),
            kind,
        });
    };

    let mut templates: Vec<(String, &str)> = vec![("path".to_string(), scenario.path.as_str())];
    for (name, value) in &scenario.headers {
        templates.push((format!("header '{name}'"), value.as_str()));
    }
    if let Some(body) = &scenario.body {
        collect_strings(body, "body", &mut templates);
    }
    for expectation in &scenario.expectations {
        match expectation {
            Expectation::BodyFieldEquals { value, .. } => {
                collect_strings(value, &expectation.description(), &mut templates);
            }
            Expectation::HeaderMatches { pattern, .. } => {
                if let Err(e) = Regex::new(pattern) {
                    report(CheckIssueKind::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    for (location, template) in templates {
        for reference in parse_variables(template) {
            if !bound.contains(&reference.name) {
                report(CheckIssueKind::UnresolvedReference {
                    name: reference.name,
                    location: location.clone(),
                });
            }
        }
    }

    for target in scenario.produces() {
        if validate_variable_name(target).is_err() {
            report(CheckIssueKind::InvalidTarget {
                name: target.to_string(),
            });
        }
    }
}

fn collect_strings<'a>(value: &'a Value, location: &str, out: &mut Vec<(String, &'a str)>) {
    match value {
        Value::String(text) => out.push((location.to_string(), text)),
        Value::Array(items) => {
            for item in items {
                collect_strings(item, location, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                collect_strings(item, location, out);
            }
        }
        _ => {}
    }
}
