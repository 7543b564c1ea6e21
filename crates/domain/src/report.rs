//! Run-level reporting types.

use serde::{Deserialize, Serialize};

use crate::expectation::ExpectationResult;

/// Why a scenario stopped before its expectations were evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A template referenced a variable that was not bound.
    UnresolvedVariable,
    /// Transport error, or an error status with `fail_on_status_code` set.
    RequestFailed,
}

impl FailureKind {
    /// Returns a short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnresolvedVariable => "unresolved variable",
            Self::RequestFailed => "request failed",
        }
    }
}

/// How a scenario ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Request sent and all expectations evaluated.
    Completed,
    /// The scenario was abandoned; the run went on.
    Aborted {
        /// Error category.
        kind: FailureKind,
        /// Human-readable error message.
        message: String,
    },
}

/// Summary of one scenario within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name.
    pub name: String,
    /// Request line as sent, when the request could be built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    /// Response status, when a response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// How the scenario ended.
    #[serde(flatten)]
    pub status: ScenarioStatus,
    /// Number of results this scenario recorded in the run's result list.
    #[serde(default)]
    pub result_count: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    /// Returns true if the scenario was aborted.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self.status, ScenarioStatus::Aborted { .. })
    }

    /// Returns the failure kind if the scenario was aborted.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match &self.status {
            ScenarioStatus::Aborted { kind, .. } => Some(*kind),
            ScenarioStatus::Completed => None,
        }
    }
}

/// Results of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Suite that was run.
    pub suite: String,
    /// Per-scenario outcomes, in execution order.
    pub scenarios: Vec<ScenarioOutcome>,
    /// Every recorded expectation result, in execution order.
    pub results: Vec<ExpectationResult>,
    /// Total number of results.
    pub total: usize,
    /// Number of passed results.
    pub passed: usize,
    /// Number of failed results.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Create a new report and compute the totals.
    #[must_use]
    pub fn new(
        suite: impl Into<String>,
        scenarios: Vec<ScenarioOutcome>,
        results: Vec<ExpectationResult>,
        duration_ms: u64,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            suite: suite.into(),
            scenarios,
            results,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// True only if every expectation result passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Iterates over failed results.
    pub fn failures(&self) -> impl Iterator<Item = &ExpectationResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Pairs each scenario outcome with the results it recorded.
    ///
    /// Results are matched by position, so scenarios sharing a name keep
    /// their own results.
    pub fn scenario_results(
        &self,
    ) -> impl Iterator<Item = (&ScenarioOutcome, &[ExpectationResult])> {
        let mut start = 0;
        self.scenarios.iter().map(move |outcome| {
            let end = start + outcome.result_count;
            let results = self.results.get(start..end).unwrap_or_default();
            start = end;
            (outcome, results)
        })
    }

    /// Finds the first scenario outcome with this name.
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
