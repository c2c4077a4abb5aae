//! Case-insensitive response headers

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Headers of a received response. Names are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    fields: BTreeMap<String, String>,
}

impl ResponseHeaders {
    /// Creates an empty header set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Inserts a header. Values of a repeated name are joined with `", "`
    /// in arrival order.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        self.fields
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    /// Returns the value for `name` in any casing.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `Date` header as a UTC timestamp.
    #[must_use]
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.get("date").and_then(parse_http_date)
    }

    /// The `Expires` header as a UTC timestamp.
    #[must_use]
    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.get("expires").and_then(parse_http_date)
    }

    /// Iterates over `(lower-cased name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}

/// Parses `Wed, 28 Nov 2018 11:44:09 GMT`.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
