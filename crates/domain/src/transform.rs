//! Bidirectional value transformers
//!
//! A transformer maps a wire scalar onto a richer domain type and back.
//! The reverse direction is total; only parsing may fail.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::coding::WireScalar;

/// Error raised when a wire value cannot be transformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The wire value is not acceptable input.
    #[error("{0}")]
    InvalidValue(String),
}

/// Converts between a wire scalar and a domain value.
pub trait ValueTransformer {
    /// The JSON-side representation.
    type Wire: WireScalar;
    /// The domain-side representation.
    type Domain;

    /// Wire to domain.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidValue`] if `value` cannot be parsed.
    fn transformed_value(&self, value: Self::Wire) -> Result<Self::Domain, TransformError>;

    /// Domain to wire.
    fn reverse_transformed_value(&self, value: &Self::Domain) -> Self::Wire;
}

/// `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`, always UTC.
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats a timestamp with millisecond precision in UTC.
#[must_use]
pub fn format_iso8601(value: &DateTime<Utc>) -> String {
    value.format(ISO8601_FORMAT).to_string()
}

/// Parses a timestamp produced by [`format_iso8601`].
///
/// # Errors
///
/// Returns [`TransformError::InvalidValue`] if `value` does not match the format.
pub fn parse_iso8601(value: &str) -> Result<DateTime<Utc>, TransformError> {
    NaiveDateTime::parse_from_str(value, ISO8601_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| TransformError::InvalidValue(format!("'{value}' is not a valid ISO 8601 date")))
}

/// String <-> `DateTime<Utc>` in the fixed millisecond ISO 8601 format.
///
/// Only millisecond-precision instants survive a round trip: sub-millisecond
/// digits are truncated when formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso8601DateTimeTransformer;

impl ValueTransformer for Iso8601DateTimeTransformer {
    type Wire = String;
    type Domain = DateTime<Utc>;

    fn transformed_value(&self, value: String) -> Result<DateTime<Utc>, TransformError> {
        parse_iso8601(&value)
    }

    fn reverse_transformed_value(&self, value: &DateTime<Utc>) -> String {
        format_iso8601(value)
    }
}

/// String <-> absolute [`Url`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTransformer;

impl ValueTransformer for UrlTransformer {
    type Wire = String;
    type Domain = Url;

    fn transformed_value(&self, value: String) -> Result<Url, TransformError> {
        Url::parse(&value).map_err(|_| TransformError::InvalidValue(format!("'{value}' is not a valid URL")))
    }

    fn reverse_transformed_value(&self, value: &Url) -> String {
        value.as_str().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_iso8601_round_trip() {
        let transformer = Iso8601DateTimeTransformer;
        let parsed = transformer
            .transformed_value("2016-12-24T20:15:30.000Z".into())
            .unwrap();

        assert_eq!(parsed, Utc.with_ymd_and_hms(2016, 12, 24, 20, 15, 30).unwrap());
        assert_eq!(
            transformer.reverse_transformed_value(&parsed),
            "2016-12-24T20:15:30.000Z"
        );
    }

    #[test]
    fn test_iso8601_keeps_milliseconds() {
        let parsed = parse_iso8601("2020-01-02T03:04:05.678Z").unwrap();
        assert_eq!(format_iso8601(&parsed), "2020-01-02T03:04:05.678Z");
    }

    #[test]
    fn test_iso8601_truncates_below_milliseconds() {
        let transformer = Iso8601DateTimeTransformer;
        let precise = Utc.with_ymd_and_hms(2016, 12, 24, 20, 15, 30).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);

        let wire = transformer.reverse_transformed_value(&precise);
        let back = transformer.transformed_value(wire.clone()).unwrap();

        assert_eq!(wire, "2016-12-24T20:15:30.123Z");
        assert_ne!(back, precise);
        assert_eq!(back, precise.with_nanosecond(123_000_000).unwrap());
    }

    #[test]
    fn test_iso8601_rejects_other_layouts() {
        assert!(parse_iso8601("2016-12-24 20:15:30").is_err());
        assert!(parse_iso8601("2016-12-24T20:15:30+01:00").is_err());
    }

    #[test]
    fn test_url_transformer() {
        let url = UrlTransformer
            .transformed_value("https://example.com/path?q=1".into())
            .unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(
            UrlTransformer.reverse_transformed_value(&url),
            "https://example.com/path?q=1"
        );
    }

    #[test]
    fn test_url_transformer_error_message() {
        let err = UrlTransformer.transformed_value("::".into()).unwrap_err();
        assert_eq!(err.to_string(), "'::' is not a valid URL");
    }
}
