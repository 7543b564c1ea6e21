//! Command implementations.

use std::path::Path;
use std::sync::Arc;

use sonde_application::{CheckIssue, ScenarioRunner, SuiteCheck};
use sonde_domain::{RunReport, Suite};
use sonde_infrastructure::{ConfigLoader, ReqwestHttpClient, load_seeds, load_suite, render_report};
use tracing::info;

use crate::cli::{CheckArgs, RunArgs};
use crate::error::{AppError, AppResult};

/// Loads a suite and merges an optional seed file over its seeds.
///
/// # Errors
///
/// Returns `AppError::Load` if either file cannot be loaded.
pub async fn load(suite: &Path, seeds: Option<&Path>) -> AppResult<Suite> {
    let mut loaded = load_suite(suite).await?;
    if let Some(path) = seeds {
        loaded.merge_seeds(load_seeds(path).await?);
    }
    Ok(loaded)
}

/// Runs a suite and writes the rendered report.
///
/// Configuration is resolved and validated before any request is sent.
///
/// # Errors
///
/// Returns `AppError` for configuration, loading, client setup, rendering
/// or output failures. Failed expectations are not errors; they are in the
/// returned report.
pub async fn run(args: &RunArgs) -> AppResult<RunReport> {
    let suite = load(&args.suite, args.seeds.as_deref()).await?;

    let mut loader = ConfigLoader::new()
        .with_suite_base_url(suite.base_url.clone())
        .with_overrides(args.overrides());
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    let config = loader.load()?;
    info!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "configuration loaded");

    let client = ReqwestHttpClient::new(&config)?;
    let runner = ScenarioRunner::new(Arc::new(client));
    let report = runner.run_suite(&suite).await;

    let rendered = render_report(&report, args.format.into())?;
    write_output(args.output.as_deref(), &rendered).await?;

    Ok(report)
}

/// Checks a suite without sending requests and prints what it finds.
///
/// # Errors
///
/// Returns `AppError::Load` if the suite or seed file cannot be loaded.
pub async fn check(args: &CheckArgs) -> AppResult<Vec<CheckIssue>> {
    let suite = load(&args.suite, args.seeds.as_deref()).await?;
    let issues = SuiteCheck::run(&suite);

    if issues.is_empty() {
        println!("{}: {} scenarios, no issues", suite.name, suite.scenarios.len());
    } else {
        for issue in &issues {
            println!("{issue}");
        }
        println!("{}: {} issue(s)", suite.name, issues.len());
    }

    Ok(issues)
}

async fn write_output(path: Option<&Path>, rendered: &str) -> AppResult<()> {
    match path {
        Some(path) => tokio::fs::write(path, rendered)
            .await
            .map_err(|source| AppError::Output {
                path: path.to_path_buf(),
                source,
            }),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}
