//! Template parser for `${variable}` syntax
//!
//! Parses strings to extract variable references with their positions.

use std::ops::Range;

/// A variable reference found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without `${` `}`).
    pub name: String,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a string and extracts all variable references.
///
/// A reference is `${name}`; surrounding whitespace inside the braces is
/// ignored. An unclosed `${` ends parsing, and `${}` is skipped.
///
/// # Examples
///
/// ```
/// use sonde_application::template::parser::parse_variables;
///
/// let refs = parse_variables("/posts/${post.id}?token=${token}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "post.id");
/// assert_eq!(refs[1].name, "token");
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut offset = 0;

    while let Some(found) = input[offset..].find("${") {
        let start = offset + found;
        let name_start = start + 2;

        let Some(close) = input[name_start..].find('}') else {
            break;
        };
        let end = name_start + close + 1;

        let name = input[name_start..end - 1].trim();
        if !name.is_empty() {
            references.push(VariableReference::new(name, start..end));
        }
        offset = end;
    }

    references
}

/// Returns the variable name if the whole input is a single reference.
///
/// Such a template resolves to the bound value with its original JSON type.
#[must_use]
pub fn whole_reference(input: &str) -> Option<String> {
    match parse_variables(input).as_slice() {
        [only] if only.span == (0..input.len()) => Some(only.name.clone()),
        _ => None,
    }
}
