//! HTTP Header types
//!
//! Header names are matched case-insensitively; the spelling of the first
//! insertion is kept for display and for the wire.

use serde::{Deserialize, Serialize};

/// A single HTTP header with name and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name (e.g., "Content-Type")
    pub name: String,
    /// The header value (e.g., "application/json")
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A collection of HTTP headers with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets a header, replacing any existing value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.items[index].value = value,
            None => self.items.push(Header::new(name, value)),
        }
    }

    /// Adds a value for a header, joining repeated headers with `, `.
    pub fn append(&mut self, name: impl Into<String>, value: impl AsRef<str>) {
        let name = name.into();
        match self.position(&name) {
            Some(index) => {
                let existing = &mut self.items[index].value;
                existing.push_str(", ");
                existing.push_str(value.as_ref());
            }
            None => self.items.push(Header::new(name, value.as_ref())),
        }
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.items[index].value.as_str())
    }

    /// Returns true if a header with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns an iterator over all headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.items.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|h| h.name.eq_ignore_ascii_case(name))
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.append(header.name, header.value);
        }
        headers
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(name, value)| Header::new(name, value))
            .collect()
    }
}
