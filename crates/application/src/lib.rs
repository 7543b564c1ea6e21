//! Sonde Application - Scenario execution
//!
//! This crate defines the application layer with:
//! - The `HttpClient` port implemented by the infrastructure layer
//! - `${var}` template resolution against the run context
//! - Request building, assertion evaluation and value extraction
//! - The scenario runner and the static suite check

pub mod assertion;
pub mod check;
pub mod error;
pub mod execute_request;
pub mod extraction;
pub mod ports;
pub mod request_builder;
pub mod runner;
pub mod template;

pub use assertion::AssertionEngine;
pub use check::{CheckIssue, CheckIssueKind, SuiteCheck};
pub use error::{RequestFailure, ScenarioError};
pub use execute_request::ExecuteRequest;
pub use extraction::Extractor;
pub use ports::{HttpClient, HttpClientError};
pub use request_builder::RequestBuilder;
pub use runner::ScenarioRunner;
pub use template::{ResolutionResult, TemplateResolver};
