//! Scenario runner
//!
//! Executes scenarios strictly in order, threading values extracted from one
//! response into the templates of the next request.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use sonde_domain::{
    ExpectationResult, RunContext, RunReport, Scenario, ScenarioOutcome, ScenarioStatus, Suite,
};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::assertion::AssertionEngine;
use crate::error::ScenarioError;
use crate::execute_request::ExecuteRequest;
use crate::extraction::Extractor;
use crate::ports::HttpClient;
use crate::request_builder::RequestBuilder;

/// Runs scenarios against one HTTP client.
///
/// Holds no per-run state; each run owns its `RunContext`, so independent
/// runs may share a runner.
pub struct ScenarioRunner<C: HttpClient> {
    execute: ExecuteRequest<C>,
}

/// Everything one scenario contributed to the report.
struct ScenarioRun {
    outcome: ScenarioOutcome,
    results: Vec<ExpectationResult>,
}

impl<C: HttpClient> ScenarioRunner<C> {
    /// Creates a runner over the given client.
    pub const fn new(client: Arc<C>) -> Self {
        Self {
            execute: ExecuteRequest::new(client),
        }
    }

    /// Runs a suite starting from its seeds.
    pub async fn run_suite(&self, suite: &Suite) -> RunReport {
        let mut context = suite.initial_context();
        self.run(&suite.name, &suite.scenarios, &mut context).await
    }

    /// Runs scenarios in order against a caller-owned context.
    ///
    /// A failing scenario never stops the run: later scenarios still execute
    /// and report unresolved variables if they depended on it.
    pub async fn run(
        &self,
        suite: &str,
        scenarios: &[Scenario],
        context: &mut RunContext,
    ) -> RunReport {
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(scenarios.len());
        let mut results = Vec::new();

        info!(suite, scenarios = scenarios.len(), "starting run");

        for scenario in scenarios {
            let span = info_span!("scenario", name = %scenario.name);
            let run = self.run_scenario(scenario, context).instrument(span).await;
            outcomes.push(run.outcome);
            results.extend(run.results);
        }

        let report = RunReport::new(suite, outcomes, results, elapsed_ms(start));
        info!(
            suite,
            passed = report.passed,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "run finished"
        );
        report
    }

    async fn run_scenario(&self, scenario: &Scenario, context: &mut RunContext) -> ScenarioRun {
        let start = Instant::now();

        let request = match RequestBuilder::build(scenario, context) {
            Ok(request) => request,
            Err(err) => return aborted(scenario, None, &err, start),
        };
        let request_line = request.to_string();
        info!(request = %request_line, "sending request");

        let response = match self
            .execute
            .send(&request, scenario.fail_on_status_code)
            .await
        {
            Ok(response) => response,
            Err(source) => {
                let err = ScenarioError::RequestFailed {
                    request: request_line.clone(),
                    source,
                };
                return aborted(scenario, Some(request_line), &err, start);
            }
        };

        let mut results =
            AssertionEngine::evaluate(&scenario.name, &scenario.expectations, &response, context);
        results.extend(Extractor::apply(
            &scenario.name,
            &scenario.extract,
            &response,
            context,
        ));

        let failed = results.iter().filter(|r| !r.passed).count();
        info!(
            status = response.status.as_u16(),
            passed = results.len() - failed,
            failed,
            "scenario completed"
        );
        for result in results.iter().filter(|r| !r.passed) {
            debug!(
                check = %result.description,
                message = result.message.as_deref().unwrap_or_default(),
                "check failed"
            );
        }

        ScenarioRun {
            outcome: ScenarioOutcome {
                name: scenario.name.clone(),
                request: Some(request_line),
                status_code: Some(response.status.as_u16()),
                status: ScenarioStatus::Completed,
                result_count: results.len(),
                duration_ms: elapsed_ms(start),
            },
            results,
        }
    }
}

/// Records an aborted scenario as one failed result.
fn aborted(
    scenario: &Scenario,
    request: Option<String>,
    err: &ScenarioError,
    start: Instant,
) -> ScenarioRun {
    warn!(error = %err, "scenario aborted");

    let status_code = match err {
        ScenarioError::RequestFailed { source, .. } => {
            source.response().map(|r| r.status.as_u16())
        }
        ScenarioError::UnresolvedVariable { .. } => None,
    };
    let kind = err.kind();

    let mut result = ExpectationResult::fail(&scenario.name, kind.label(), err.to_string());
    if let ScenarioError::UnresolvedVariable { names, .. } = err {
        result = result.with_expected(Value::from(names.clone()));
    }
    if let Some(code) = status_code {
        result = result.with_actual(Some(Value::from(code)));
    }

    ScenarioRun {
        outcome: ScenarioOutcome {
            name: scenario.name.clone(),
            request,
            status_code,
            status: ScenarioStatus::Aborted {
                kind,
                message: err.to_string(),
            },
            result_count: 1,
            duration_ms: elapsed_ms(start),
        },
        results: vec![result],
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
