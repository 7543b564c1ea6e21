//! Human-readable report rendering.

use std::fmt;

use serde_json::Value;
use sonde_domain::{ExpectationResult, RunReport, ScenarioOutcome, ScenarioStatus};

const PASS: &str = "✓";
const FAIL: &str = "✗";

/// Renders a report as indented text, one block per scenario.
///
/// ```text
/// Suite: json-server
///   ✓ get all posts  GET /posts -> 200 (4 ms)
///       ✓ status equals 200
///   ✗ read post  GET /posts/1 -> 200 (3 ms)
///       ✗ body.id equals 55
///           expected: 55
///           actual:   60
///           body.id value mismatch: expected 55, got 60
///
/// 1 passed, 1 failed, 2 total (50.0%) in 9 ms
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    report: &'a RunReport,
}

impl<'a> TextReport<'a> {
    /// Wraps a report for display.
    #[must_use]
    pub const fn new(report: &'a RunReport) -> Self {
        Self { report }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "Suite: {}", report.suite)?;

        for (outcome, results) in report.scenario_results() {
            write_scenario(f, outcome, results)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{} passed, {} failed, {} total ({:.1}%) in {} ms",
            report.passed,
            report.failed,
            report.total,
            report.pass_rate(),
            report.duration_ms
        )
    }
}

fn write_scenario(
    f: &mut fmt::Formatter<'_>,
    outcome: &ScenarioOutcome,
    results: &[ExpectationResult],
) -> fmt::Result {
    let passed = !outcome.is_aborted() && results.iter().all(|r| r.passed);
    write!(f, "  {} {}", mark(passed), outcome.name)?;

    if let Some(request) = &outcome.request {
        write!(f, "  {request}")?;
    }
    if let Some(code) = outcome.status_code {
        write!(f, " -> {code}")?;
    }

    match &outcome.status {
        ScenarioStatus::Completed => {
            writeln!(f, " ({} ms)", outcome.duration_ms)?;
            for result in results {
                write_result(f, result)?;
            }
        }
        ScenarioStatus::Aborted { kind, message } => {
            writeln!(f, "  aborted ({}): {message}", kind.label())?;
        }
    }
    Ok(())
}

fn write_result(f: &mut fmt::Formatter<'_>, result: &ExpectationResult) -> fmt::Result {
    writeln!(f, "      {} {}", mark(result.passed), result.description)?;
    if result.passed {
        return Ok(());
    }

    if let Some(expected) = &result.expected {
        writeln!(f, "          expected: {}", display_value(Some(expected)))?;
        writeln!(f, "          actual:   {}", display_value(result.actual.as_ref()))?;
    } else if let Some(actual) = &result.actual {
        writeln!(f, "          actual:   {actual}")?;
    }
    if let Some(message) = &result.message {
        writeln!(f, "          {message}")?;
    }
    Ok(())
}

const fn mark(passed: bool) -> &'static str {
    if passed { PASS } else { FAIL }
}

fn display_value(value: Option<&Value>) -> String {
    value.map_or_else(|| "(absent)".to_string(), Value::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sonde_domain::FailureKind;

    fn sample() -> RunReport {
        let scenarios = vec![
            ScenarioOutcome {
                name: "read post".into(),
                request: Some("GET /posts/1".into()),
                status_code: Some(200),
                status: ScenarioStatus::Completed,
                result_count: 2,
                duration_ms: 3,
            },
            ScenarioOutcome {
                name: "create protected post".into(),
                request: None,
                status_code: None,
                status: ScenarioStatus::Aborted {
                    kind: FailureKind::UnresolvedVariable,
                    message: "unresolved variable 'token'".into(),
                },
                result_count: 1,
                duration_ms: 0,
            },
        ];
        let results = vec![
            ExpectationResult::pass("read post", "status equals 200"),
            ExpectationResult::fail(
                "read post",
                "body.id equals 55",
                "body.id value mismatch: expected 55, got 60",
            )
            .with_expected(55)
            .with_actual(Some(json!(60))),
            ExpectationResult::fail(
                "create protected post",
                "unresolved variable",
                "unresolved variable 'token'",
            ),
        ];
        RunReport::new("json-server", scenarios, results, 9)
    }

    #[test]
    fn test_renders_scenarios_and_totals() {
        let text = TextReport::new(&sample()).to_string();
        let expected = "\
Suite: json-server
  ✗ read post  GET /posts/1 -> 200 (3 ms)
      ✓ status equals 200
      ✗ body.id equals 55
          expected: 55
          actual:   60
          body.id value mismatch: expected 55, got 60
  ✗ create protected post  aborted (unresolved variable): unresolved variable 'token'

1 passed, 2 failed, 3 total (33.3%) in 9 ms
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_absent_actual() {
        let result = ExpectationResult::fail("s", "body.id equals 1", "body.id not found")
            .with_expected(1);
        let report = RunReport::new(
            "x",
            vec![ScenarioOutcome {
                name: "s".into(),
                request: Some("GET /".into()),
                status_code: Some(200),
                status: ScenarioStatus::Completed,
                result_count: 1,
                duration_ms: 1,
            }],
            vec![result],
            1,
        );
        assert!(TextReport::new(&report).to_string().contains("actual:   (absent)"));
    }

    #[test]
    fn test_actual_without_expected() {
        let result = ExpectationResult::fail("s", "body.id is undefined", "body.id is present")
            .with_actual(Some(json!(5)));
        let scenarios = vec![completed("s", "DELETE /posts/5", 1)];
        let report = RunReport::new("x", scenarios, vec![result], 1);

        let text = TextReport::new(&report).to_string();
        assert!(text.contains("      ✗ body.id is undefined\n          actual:   5\n"));
        assert!(!text.contains("expected:"));
    }

    #[test]
    fn test_same_named_scenarios_render_separately() {
        let scenarios = vec![
            completed("update post", "PUT /posts/1", 1),
            ScenarioOutcome {
                name: "update post".into(),
                request: None,
                status_code: None,
                status: ScenarioStatus::Aborted {
                    kind: FailureKind::UnresolvedVariable,
                    message: "unresolved variable 'doomed.id'".into(),
                },
                result_count: 1,
                duration_ms: 0,
            },
        ];
        let results = vec![
            ExpectationResult::pass("update post", "status equals 200"),
            ExpectationResult::fail(
                "update post",
                "unresolved variable",
                "unresolved variable 'doomed.id'",
            ),
        ];
        let report = RunReport::new("posts", scenarios, results, 2);

        let text = TextReport::new(&report).to_string();
        assert!(text.contains(
            "  ✓ update post  PUT /posts/1 -> 200 (1 ms)\n      ✓ status equals 200\n  ✗ update post  aborted"
        ));
    }

    fn completed(name: &str, request: &str, result_count: usize) -> ScenarioOutcome {
        ScenarioOutcome {
            name: name.into(),
            request: Some(request.into()),
            status_code: Some(200),
            status: ScenarioStatus::Completed,
            result_count,
            duration_ms: 1,
        }
    }
}
