//! Sonde Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration, file loading and
//! report rendering.

pub mod adapters;
pub mod config;
pub mod report;
pub mod serialization;

pub use adapters::ReqwestHttpClient;
pub use config::{ConfigError, ConfigLoader, ConfigOverrides, RunnerConfig};
pub use report::{ReportFormat, TextReport, render_report};
pub use serialization::{
    FileFormat, LoadError, SerializationError, from_json, load_seeds, load_suite, to_json_stable,
};
