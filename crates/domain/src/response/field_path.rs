//! Paths into a JSON response body.
//!
//! Supports `id`, `user.name`, `[0].id`, `items[2].id`, `0.id` and `$` for
//! the whole body. A leading `$.` is accepted and ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member, or an array index when the key is all digits.
    Key(String),
    /// Explicit bracketed array index.
    Index(usize),
}

/// A parsed path into a JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Parses a path.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFieldPath` for unbalanced brackets,
    /// non-numeric indices or empty segments.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let raw = input.trim();
        let body = raw.strip_prefix('$').unwrap_or(raw);
        let body = body.strip_prefix('.').unwrap_or(body);

        let mut segments = Vec::new();
        for part in split_segments(body, raw)? {
            parse_segment(&part, raw, &mut segments)?;
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Looks the path up in a JSON value; `None` means the field is absent.
    #[must_use]
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key),
                (segment, Value::Array(items)) => segment.index().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Writes `value` at the path inside `target`.
    ///
    /// A missing last member of an object is created. Returns the previous
    /// value on success, or hands `value` back when the parent is absent or
    /// cannot hold the member.
    ///
    /// # Errors
    ///
    /// Returns `Err(value)` when nothing was written.
    pub fn assign(&self, target: &mut Value, value: Value) -> Result<Option<Value>, Value> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Ok(Some(std::mem::replace(target, value)));
        };

        let parent = parents
            .iter()
            .try_fold(target, |current, segment| match current {
                Value::Object(map) => match segment {
                    PathSegment::Key(key) => map.get_mut(key),
                    PathSegment::Index(_) => None,
                },
                Value::Array(items) => segment.index().and_then(|i| items.get_mut(i)),
                _ => None,
            });

        match (last, parent) {
            (PathSegment::Key(key), Some(Value::Object(map))) => Ok(map.insert(key.clone(), value)),
            (last, Some(Value::Array(items))) => {
                match last.index().and_then(|i| items.get_mut(i)) {
                    Some(slot) => Ok(Some(std::mem::replace(slot, value))),
                    None => Err(value),
                }
            }
            _ => Err(value),
        }
    }
}

impl PathSegment {
    /// Array index addressed by this segment, if any.
    fn index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(key) => key.parse().ok(),
        }
    }
}

/// Split on dots outside brackets, keeping bracket groups attached to the
/// preceding key.
fn split_segments(path: &str, raw: &str) -> DomainResult<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if current.is_empty() {
                    return Err(invalid(raw, "empty segment"));
                }
                segments.push(std::mem::take(&mut current));
            }
            '[' if in_bracket => return Err(invalid(raw, "nested '['")),
            '[' => {
                in_bracket = true;
                current.push(ch);
            }
            ']' if !in_bracket => return Err(invalid(raw, "unmatched ']'")),
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if in_bracket {
        return Err(invalid(raw, "unclosed '['"));
    }
    if !current.is_empty() {
        segments.push(current);
    } else if !path.is_empty() {
        return Err(invalid(raw, "trailing '.'"));
    }

    Ok(segments)
}

/// Parse `name`, `name[1]`, `[0]` or `name[1][2]` into segments.
fn parse_segment(part: &str, raw: &str, out: &mut Vec<PathSegment>) -> DomainResult<()> {
    let (name, mut rest) = match part.find('[') {
        Some(start) => part.split_at(start),
        None => (part, ""),
    };

    if !name.is_empty() {
        out.push(PathSegment::Key(name.to_string()));
    }

    while !rest.is_empty() {
        let close = rest
            .find(']')
            .ok_or_else(|| invalid(raw, "unclosed '['"))?;
        let index = &rest[1..close];
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid(raw, &format!("invalid array index '{index}'")))?;
        out.push(PathSegment::Index(index));
        rest = &rest[close + 1..];
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(invalid(raw, "unexpected text after ']'"));
        }
    }

    Ok(())
}

fn invalid(raw: &str, reason: &str) -> DomainError {
    DomainError::InvalidFieldPath {
        path: raw.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FieldPath {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
