//! Request builder
//!
//! Turns a scenario plus the current run context into a concrete request.

use sonde_domain::{RequestDescriptor, RunContext, Scenario};

use crate::error::ScenarioError;
use crate::template::TemplateResolver;

const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds request descriptors from scenarios. Has no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder;

impl RequestBuilder {
    /// Resolves the path, header and body templates of a scenario.
    ///
    /// A JSON body gets `Content-Type: application/json` unless the scenario
    /// declares its own content type.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::UnresolvedVariable` naming the first unbound
    /// reference and listing all of them.
    pub fn build(
        scenario: &Scenario,
        context: &RunContext,
    ) -> Result<RequestDescriptor, ScenarioError> {
        let resolver = TemplateResolver::new(context);
        let mut unresolved = Vec::new();

        let path = resolver.resolve(&scenario.path);
        unresolved.extend(path.unresolved);

        let mut request = RequestDescriptor::new(scenario.method, path.resolved);

        for (name, template) in &scenario.headers {
            let value = resolver.resolve(template);
            unresolved.extend(value.unresolved);
            request.headers.insert(name.as_str(), value.resolved);
        }

        if let Some(template) = &scenario.body {
            let body = resolver.resolve_value(template);
            unresolved.extend(body.unresolved);
            if !request.headers.contains(CONTENT_TYPE) {
                request.headers.insert(CONTENT_TYPE, JSON_CONTENT_TYPE);
            }
            request.body = Some(body.value.to_string());
        }

        match ScenarioError::unresolved(unresolved) {
            Some(err) => Err(err),
            None => Ok(request),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sonde_domain::HttpMethod;

    #[test]
    fn test_path_uses_bound_post_id() {
        let mut ctx = RunContext::new();
        ctx.bind("post.id", json!("23434343"));
        let scenario = Scenario::get("read created post", "/posts/${post.id}");

        let request = RequestBuilder::build(&scenario, &ctx).unwrap();
        assert_eq!(request.path, "/posts/23434343");
        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.body.is_none());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_headers_and_body() {
        let mut ctx = RunContext::new();
        ctx.bind("token", json!("abc"));
        ctx.bind("post", json!({"userId": 1, "title": "hello"}));

        let scenario = Scenario::new("create post", HttpMethod::Post, "/664/posts")
            .with_header("Authorization", "Bearer ${token}")
            .with_body(json!({"userId": "${post.userId}", "title": "${post.title}"}));

        let request = RequestBuilder::build(&scenario, &ctx).unwrap();
        assert_eq!(request.headers.get("authorization"), Some("Bearer abc"));
        assert_eq!(request.headers.get("content-type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"userId": 1, "title": "hello"}));
    }

    #[test]
    fn test_declared_content_type_is_kept() {
        let scenario = Scenario::new("patch", HttpMethod::Patch, "/posts/1")
            .with_header("content-type", "application/merge-patch+json")
            .with_body(json!({"title": "x"}));

        let request = RequestBuilder::build(&scenario, &RunContext::new()).unwrap();
        assert_eq!(request.headers.len(), 1);
        assert_eq!(
            request.headers.get("Content-Type"),
            Some("application/merge-patch+json")
        );
    }

    #[test]
    fn test_unresolved_token_is_reported() {
        let scenario = Scenario::get("me", "/users/${user.id}")
            .with_header("Authorization", "Bearer ${token}");

        let err = RequestBuilder::build(&scenario, &RunContext::new()).unwrap_err();
        match err {
            ScenarioError::UnresolvedVariable { name, names } => {
                assert_eq!(name, "user.id");
                assert_eq!(names, vec!["user.id", "token"]);
            }
            other @ ScenarioError::RequestFailed { .. } => {
                unreachable!("unexpected error: {other}")
            }
        }
    }
}
