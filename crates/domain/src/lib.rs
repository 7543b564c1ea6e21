//! Sonde Domain - Core scenario types
//!
//! This crate defines the domain model for the Sonde HTTP scenario runner.
//! All types here are pure Rust with no I/O dependencies.

pub mod context;
pub mod error;
pub mod expectation;
pub mod report;
pub mod request;
pub mod response;
pub mod scenario;
pub mod suite;

pub use context::{RunContext, validate_variable_name};
pub use error::{DomainError, DomainResult};
pub use expectation::{Expectation, ExpectationResult};
pub use report::{FailureKind, RunReport, ScenarioOutcome, ScenarioStatus};
pub use request::{Header, Headers, HttpMethod, RequestDescriptor};
pub use response::{FieldPath, PathSegment, ResponseEnvelope, StatusCode};
pub use scenario::{ExtractionRule, Scenario};
pub use suite::Suite;
