//! Template resolution engine
//!
//! Resolves `${variable}` references against a run context.

use serde_json::Value;
use sonde_domain::RunContext;

use super::parser::{parse_variables, whole_reference};

/// Result of resolving a string template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The resolved string; unresolved references are kept verbatim.
    pub resolved: String,

    /// Variable names that could not be resolved.
    pub unresolved: Vec<String>,

    /// Whether all variables were successfully resolved.
    pub is_complete: bool,
}

impl ResolutionResult {
    /// Creates a result for input with no variables.
    #[must_use]
    pub fn no_variables(input: &str) -> Self {
        Self {
            resolved: input.to_string(),
            unresolved: Vec::new(),
            is_complete: true,
        }
    }
}

/// Result of resolving a structured (JSON) template.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueResolution {
    /// The resolved value.
    pub value: Value,

    /// Variable names that could not be resolved.
    pub unresolved: Vec<String>,
}

impl ValueResolution {
    /// Whether all variables were successfully resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Resolves `${variable}` references against a borrowed run context.
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    context: &'a RunContext,
}

impl<'a> TemplateResolver<'a> {
    /// Creates a resolver over the given context.
    #[must_use]
    pub const fn new(context: &'a RunContext) -> Self {
        Self { context }
    }

    /// Resolves all variables in a string, rendering values as text.
    #[must_use]
    pub fn resolve(&self, input: &str) -> ResolutionResult {
        let references = parse_variables(input);

        if references.is_empty() {
            return ResolutionResult::no_variables(input);
        }

        let mut unresolved = Vec::new();
        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;

        for var_ref in &references {
            result.push_str(&input[last_end..var_ref.span.start]);

            if let Some(value) = self.context.get(&var_ref.name) {
                result.push_str(&render_text(value));
            } else {
                result.push_str(&input[var_ref.span.clone()]);
                unresolved.push(var_ref.name.clone());
            }

            last_end = var_ref.span.end;
        }

        result.push_str(&input[last_end..]);

        let is_complete = unresolved.is_empty();
        ResolutionResult {
            resolved: result,
            unresolved,
            is_complete,
        }
    }

    /// Resolves every string inside a JSON value.
    ///
    /// A string that is exactly one `${var}` becomes the bound value with its
    /// JSON type; other strings are interpolated as text. Object keys are
    /// left alone.
    #[must_use]
    pub fn resolve_value(&self, template: &Value) -> ValueResolution {
        let mut unresolved = Vec::new();
        let value = self.resolve_into(template, &mut unresolved);
        ValueResolution { value, unresolved }
    }

    fn resolve_into(&self, template: &Value, unresolved: &mut Vec<String>) -> Value {
        match template {
            Value::String(text) => {
                if let Some(name) = whole_reference(text) {
                    if let Some(value) = self.context.get(&name) {
                        return value.clone();
                    }
                    unresolved.push(name);
                    return template.clone();
                }
                let result = self.resolve(text);
                unresolved.extend(result.unresolved);
                Value::String(result.resolved)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_into(item, unresolved))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.resolve_into(item, unresolved)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Strings are inserted verbatim, everything else in its JSON rendering.
fn render_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
