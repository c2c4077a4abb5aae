//! Non-success HTTP responses

use thiserror::Error;

use super::payload::{parse_fragment, parse_json, parse_object};
use super::{HttpStatus, ResponseHeaders};
use crate::coding::{Convertible, TypeRegistry, WireScalar};
use crate::error::PayloadError;
use crate::wire::WireValue;

/// A well-formed response whose status is not a success.
///
/// The raw body is kept so callers can try a secondary decode, e.g. into a
/// server-defined error document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP error {status}")]
pub struct HttpError {
    /// The response status.
    pub status: HttpStatus,
    /// The response headers.
    pub headers: ResponseHeaders,
    /// The raw response body, if any.
    pub body: Option<Vec<u8>>,
}

impl HttpError {
    /// Creates an error from a received response.
    #[must_use]
    pub const fn new(status: HttpStatus, headers: ResponseHeaders, body: Option<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Decodes the body as a JSON object.
    ///
    /// # Errors
    ///
    /// `EmptyResponse` for a missing body, or any object parse error.
    pub fn decoded_object<T: Convertible>(&self, registry: &TypeRegistry) -> Result<T, PayloadError> {
        parse_object(self.body(), registry, None)
    }

    /// Decodes the body as a single JSON scalar.
    ///
    /// # Errors
    ///
    /// `EmptyResponse`, `MalformedJson` or `UnexpectedType`.
    pub fn decoded_value<T: WireScalar>(&self) -> Result<T, PayloadError> {
        parse_fragment(self.body())
    }

    /// Parses the body as untyped JSON.
    ///
    /// # Errors
    ///
    /// `EmptyResponse` or `MalformedJson`.
    pub fn decoded_json(&self) -> Result<WireValue, PayloadError> {
        parse_json(self.body())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::coding::{DecodeContext, EncodeContext};
    use crate::error::{DecodeResult, EncodeResult, ResponseError};
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Problem {
        reason: String,
    }

    impl Convertible for Problem {
        const TYPE_NAME: &'static str = "Problem";

        fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
            Ok(Self {
                reason: ctx.decode("reason")?,
            })
        }

        fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
            ctx.encode("reason", &self.reason);
            Ok(())
        }
    }

    #[test]
    fn test_message() {
        let err = HttpError::new(HttpStatus::NotFound, ResponseHeaders::new(), None);
        assert_eq!(err.to_string(), "HTTP error 404 (Not Found)");
    }

    #[test]
    fn test_secondary_decode() {
        let err = HttpError::new(
            HttpStatus::UnprocessableEntity,
            ResponseHeaders::new(),
            Some(br#"{"reason": "name taken"}"#.to_vec()),
        );

        let problem: Problem = err.decoded_object(&TypeRegistry::new()).unwrap();

        assert_eq!(problem.reason, "name taken");
    }

    #[test]
    fn test_secondary_decode_without_body() {
        let err = HttpError::new(HttpStatus::BadGateway, ResponseHeaders::new(), None);
        assert_eq!(
            err.decoded_json(),
            Err(PayloadError::Response(ResponseError::EmptyResponse))
        );
    }

    #[test]
    fn test_decoded_value() {
        let err = HttpError::new(
            HttpStatus::Conflict,
            ResponseHeaders::new(),
            Some(b"\"duplicate\"".to_vec()),
        );
        assert_eq!(err.decoded_value::<String>().unwrap(), "duplicate");
    }
}
