//! Run context: variables threaded between scenarios of one run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::response::FieldPath;

/// Variable bindings for one run.
///
/// Values keep their JSON type so that an id bound as a number is compared
/// as a number later on. Lookups try the exact key first and otherwise
/// descend into a bound object, so `post.title` finds the `title` member of
/// a seeded `post` object. Binding `post.id` while `post` is bound writes
/// the member in place, so `${post}` and `${post.id}` never disagree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunContext {
    vars: BTreeMap<String, Value>,
}

impl RunContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Creates a context pre-populated with seed values.
    #[must_use]
    pub fn with_seeds(seeds: BTreeMap<String, Value>) -> Self {
        Self { vars: seeds }
    }

    /// Binds a variable, returning the previous value if there was one.
    ///
    /// A dotted name under a bound object or array updates that member;
    /// otherwise the name is bound as a key of its own.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        let nested = format!("{name}.");
        self.vars.retain(|key, _| !key.starts_with(&nested));

        if self.vars.contains_key(&name) {
            return self.vars.insert(name, value);
        }

        let mut value = value;
        for (index, _) in name.rmatch_indices('.') {
            let Some(root) = self.vars.get_mut(&name[..index]) else {
                continue;
            };
            let Ok(path) = FieldPath::parse(&name[index + 1..]) else {
                continue;
            };
            match path.assign(root, value) {
                Ok(previous) => return previous,
                Err(returned) => value = returned,
            }
        }

        self.vars.insert(name, value)
    }

    /// Looks a variable up.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.vars.get(name) {
            return Some(value);
        }

        // Longest bound prefix wins: "a.b.c" tries "a.b" then "a".
        name.rmatch_indices('.').find_map(|(index, _)| {
            let root = self.vars.get(&name[..index])?;
            FieldPath::parse(&name[index + 1..]).ok()?.lookup(root)
        })
    }

    /// Returns true if the variable can be resolved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns an iterator over the directly bound variables.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of directly bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Validates a variable name.
///
/// Valid names start with a letter or underscore and continue with
/// alphanumerics, `_`, `-` or `.` (dots separate object members).
///
/// # Errors
///
/// Returns `DomainError::InvalidVariableName` when the name is rejected.
pub fn validate_variable_name(name: &str) -> DomainResult<()> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid_start && valid_rest && !name.ends_with('.') && !name.contains("..") {
        Ok(())
    } else {
        Err(DomainError::InvalidVariableName(name.to_string()))
    }
}
