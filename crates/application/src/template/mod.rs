//! Template resolution
//!
//! Provides parsing and resolution of `${variable}` syntax in strings and
//! JSON values.
//!
//! # Usage
//!
//! ```
//! use serde_json::json;
//! use sonde_application::template::TemplateResolver;
//! use sonde_domain::RunContext;
//!
//! let mut ctx = RunContext::new();
//! ctx.bind("post.id", json!(42));
//!
//! let resolver = TemplateResolver::new(&ctx);
//! assert_eq!(resolver.resolve("/posts/${post.id}").resolved, "/posts/42");
//! assert_eq!(resolver.resolve_value(&json!("${post.id}")).value, json!(42));
//! ```

pub mod engine;
pub mod parser;

pub use engine::{ResolutionResult, TemplateResolver, ValueResolution};
pub use parser::{VariableReference, parse_variables, whole_reference};
