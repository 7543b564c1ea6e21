//! Assertion evaluation.

mod engine;

pub use engine::AssertionEngine;
