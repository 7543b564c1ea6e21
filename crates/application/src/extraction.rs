//! Extraction of response values into the run context.

use serde_json::Value;
use sonde_domain::{ExpectationResult, ExtractionRule, ResponseEnvelope, RunContext};
use tracing::debug;

/// Applies a scenario's extraction rules after its expectations ran.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor;

impl Extractor {
    /// Binds every extractable value and reports the rules that found
    /// nothing.
    ///
    /// A rule whose source is missing leaves its variable unbound (or at its
    /// previous value) and yields a failed result. Successful bindings are
    /// not recorded as results.
    pub fn apply(
        scenario: &str,
        rules: &[ExtractionRule],
        response: &ResponseEnvelope,
        context: &mut RunContext,
    ) -> Vec<ExpectationResult> {
        let mut failures = Vec::new();

        for rule in rules {
            match Self::source_value(rule, response) {
                Some(value) => {
                    debug!(scenario, variable = rule.target(), %value, "bound variable");
                    context.bind(rule.target(), value);
                }
                None => {
                    failures.push(ExpectationResult::fail(
                        scenario,
                        rule.description(),
                        Self::missing_message(rule),
                    ));
                }
            }
        }

        failures
    }

    fn source_value(rule: &ExtractionRule, response: &ResponseEnvelope) -> Option<Value> {
        match rule {
            ExtractionRule::Body { path, .. } => response.field(path).cloned(),
            ExtractionRule::Header { name, .. } => response.header(name).map(Value::from),
        }
    }

    fn missing_message(rule: &ExtractionRule) -> String {
        match rule {
            ExtractionRule::Body { path, .. } => format!("body.{path} not found in response"),
            ExtractionRule::Header { name, .. } => format!("header '{name}' not found in response"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sonde_domain::{FieldPath, Headers};

    use crate::template::TemplateResolver;

    fn response() -> ResponseEnvelope {
        let headers: Headers = [("Location", "/posts/101")].into_iter().collect();
        ResponseEnvelope::new(
            201,
            headers,
            json!({"id": 101, "accessToken": "eyJ.abc", "user": {"id": 3}}),
        )
    }

    #[test]
    fn test_binds_body_and_header_values() {
        let rules = [
            ExtractionRule::body(FieldPath::parse("accessToken").unwrap(), "token"),
            ExtractionRule::body(FieldPath::parse("id").unwrap(), "post.id"),
            ExtractionRule::header("location", "post.location"),
        ];
        let mut ctx = RunContext::new();

        let failures = Extractor::apply("create", &rules, &response(), &mut ctx);

        assert!(failures.is_empty());
        assert_eq!(ctx.get("token"), Some(&json!("eyJ.abc")));
        assert_eq!(ctx.get("post.id"), Some(&json!(101)));
        assert_eq!(ctx.get("post.location"), Some(&json!("/posts/101")));
    }

    #[test]
    fn test_missing_source_leaves_variable_unbound() {
        let rules = [
            ExtractionRule::body(FieldPath::parse("refreshToken").unwrap(), "refresh"),
            ExtractionRule::header("X-Request-Id", "request"),
            ExtractionRule::body(FieldPath::parse("user.id").unwrap(), "user.id"),
        ];
        let mut ctx = RunContext::new();

        let failures = Extractor::apply("login", &rules, &response(), &mut ctx);

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].description, "extract body.refreshToken into refresh");
        assert_eq!(
            failures[0].message.as_deref(),
            Some("body.refreshToken not found in response")
        );
        assert!(!ctx.contains("refresh"));
        assert!(!ctx.contains("request"));
        assert_eq!(ctx.get("user.id"), Some(&json!(3)));
    }

    #[test]
    fn test_rebinding_overwrites() {
        let mut ctx = RunContext::new();
        ctx.bind("post.id", json!("23434343"));
        let rules = [ExtractionRule::body(FieldPath::parse("id").unwrap(), "post.id")];

        Extractor::apply("update", &rules, &response(), &mut ctx);
        assert_eq!(ctx.get("post.id"), Some(&json!(101)));
    }

    #[test]
    fn test_member_extraction_shows_in_whole_object() {
        let mut ctx = RunContext::new();
        ctx.bind("post", json!({"id": 1001, "title": "t"}));
        let rules = [ExtractionRule::body(FieldPath::parse("id").unwrap(), "post.id")];

        Extractor::apply("create", &rules, &response(), &mut ctx);

        let resolver = TemplateResolver::new(&ctx);
        assert_eq!(resolver.resolve_value(&json!("${post.id}")).value, json!(101));
        assert_eq!(
            resolver.resolve_value(&json!("${post}")).value,
            json!({"id": 101, "title": "t"})
        );
    }
}
