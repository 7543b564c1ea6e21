//! End-to-end runs of the shipped json-server suite against an in-process
//! fake of the backend.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod fake_server;

use std::io::Write;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use sonde_cli::commands;
use sonde_cli::{AppError, CheckArgs, OutputFormat, RunArgs};
use sonde_domain::FailureKind;
use sonde_infrastructure::TextReport;

fn workspace_file(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(relative)
}

fn run_args(suite: PathBuf, base_url: String) -> RunArgs {
    RunArgs {
        suite,
        base_url: Some(base_url),
        seeds: None,
        config: None,
        timeout_ms: Some(5_000),
        format: OutputFormat::Json,
        output: None,
    }
}

#[tokio::test]
async fn test_json_server_suite_passes() {
    let base_url = fake_server::spawn().await;
    let output = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let args = RunArgs {
        output: Some(output.path().to_path_buf()),
        ..run_args(workspace_file("suites/json-server.yaml"), base_url)
    };

    let report = commands::run(&args).await.expect("run should succeed");

    assert!(report.all_passed(), "{}", TextReport::new(&report));
    assert_eq!(report.scenarios.len(), 16);
    assert_eq!(
        report.scenario("read created post").unwrap().request.as_deref(),
        Some("GET /posts/23434343")
    );

    let written = std::fs::read_to_string(output.path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["suite"], "json-server");
    assert_eq!(json["failed"], 0);
}

#[tokio::test]
async fn test_seed_file_overrides_suite_seeds() {
    let base_url = fake_server::spawn().await;
    let output = tempfile::NamedTempFile::new().unwrap();
    let args = RunArgs {
        seeds: Some(workspace_file("suites/fixtures/seeds.json")),
        output: Some(output.path().to_path_buf()),
        ..run_args(workspace_file("suites/json-server.yaml"), base_url)
    };

    let report = commands::run(&args).await.unwrap();

    assert!(report.all_passed(), "{}", TextReport::new(&report));
    assert_eq!(
        report.scenario("read protected post").unwrap().request.as_deref(),
        Some("GET /664/posts/4242")
    );
}

#[tokio::test]
async fn test_token_used_before_registration() {
    let base_url = fake_server::spawn().await;
    let mut suite = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        suite,
        r#"
name: out of order
seeds:
  post: {{id: 7, title: t}}
scenarios:
  - name: create protected post
    method: POST
    path: /664/posts
    headers:
      Authorization: "Bearer ${{token}}"
    body: "${{post}}"
    expect:
      - type: status_equals
        status: 201
  - name: get first page
    path: /posts?_page=1&_limit=10
    expect:
      - type: body_length_equals
        length: 10
  - name: delete missing
    method: DELETE
    path: /posts/9999
    expect:
      - type: status_equals
        status: 404
"#
    )
    .unwrap();

    let output = tempfile::NamedTempFile::new().unwrap();
    let args = RunArgs {
        output: Some(output.path().to_path_buf()),
        ..run_args(suite.path().to_path_buf(), base_url)
    };
    let report = commands::run(&args).await.unwrap();

    let kinds: Vec<_> = report.scenarios.iter().map(|s| s.failure_kind()).collect();
    assert_eq!(
        kinds,
        vec![
            Some(FailureKind::UnresolvedVariable),
            None,
            Some(FailureKind::RequestFailed)
        ]
    );
    assert_eq!(report.scenarios[2].status_code, Some(404));
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 2);
}

#[tokio::test]
async fn test_invalid_base_url_aborts_before_running() {
    let args = RunArgs {
        base_url: Some("ftp://example.test".into()),
        ..run_args(workspace_file("suites/json-server.yaml"), String::new())
    };

    let err = commands::run(&args).await.unwrap_err();
    assert!(matches!(err, AppError::Config(_)), "{err}");
}

#[tokio::test]
async fn test_shipped_suite_checks_clean() {
    let issues = commands::check(&CheckArgs {
        suite: workspace_file("suites/json-server.yaml"),
        seeds: Some(workspace_file("suites/fixtures/seeds.json")),
    })
    .await
    .unwrap();

    assert!(issues.is_empty(), "{issues:?}");
}

#[tokio::test]
async fn test_missing_suite_is_a_load_error() {
    let err = commands::check(&CheckArgs {
        suite: workspace_file("suites/missing.yaml"),
        seeds: None,
    })
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Load(_)));
}
