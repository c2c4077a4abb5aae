//! Request verbs
//!
//! Relay speaks four verbs. Whether the request's data travels as a JSON
//! body depends only on the verb: `POST` and `PUT` carry one, `GET` and
//! `DELETE` never do.

use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Verb of a [`Request`](super::Request).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Reads a resource.
    Get,
    /// Creates a resource from the body.
    Post,
    /// Replaces a resource with the body.
    Put,
    /// Removes a resource.
    Delete,
}

const VERBS: [(HttpMethod, &str); 4] = [
    (HttpMethod::Get, "GET"),
    (HttpMethod::Post, "POST"),
    (HttpMethod::Put, "PUT"),
    (HttpMethod::Delete, "DELETE"),
];

impl HttpMethod {
    /// Whether rendering attaches the request data as a body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Wire token, e.g. `"PUT"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        VERBS[self as usize].1
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    /// Case-insensitive.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        VERBS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(token))
            .map(|(method, _)| *method)
            .ok_or_else(|| DomainError::UnsupportedMethod(token.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokens_round_trip() {
        for (method, name) in VERBS {
            assert_eq!(method.to_string(), name);
            assert_eq!(name.to_lowercase().parse::<HttpMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_patch_is_not_spoken() {
        assert_eq!(
            "patch".parse::<HttpMethod>(),
            Err(DomainError::UnsupportedMethod("patch".into()))
        );
    }

    #[test]
    fn test_only_post_and_put_carry_bodies() {
        let with_body: Vec<_> = VERBS
            .iter()
            .map(|(method, _)| *method)
            .filter(|method| method.has_body())
            .collect();
        assert_eq!(with_body, vec![HttpMethod::Post, HttpMethod::Put]);
    }
}
