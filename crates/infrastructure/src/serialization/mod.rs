//! Serialization for suites, seeds and reports.
//!
//! JSON output is deterministic:
//! - Object keys sorted alphabetically (via `BTreeMap` in domain types)
//! - 2-space indentation
//! - Trailing newline

mod json;
mod suite;

pub use json::{SerializationError, from_json, to_json_stable};
pub use suite::{FileFormat, LoadError, load_seeds, load_suite, parse_document};
