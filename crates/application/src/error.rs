//! Application error types

use relay_domain::error::{DecodeError, DomainError, EncodeError, PayloadError, ResponseError};
use relay_domain::response::{HttpError, HttpStatus};
use thiserror::Error;

use crate::ports::TransportError;

/// Failures while turning a [`Request`](relay_domain::Request) into a
/// transport request. No network call is made after any of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The session's base URL is unusable.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The request path contains `.` or `..` segments.
    #[error("invalid request path: {0}")]
    InvalidPath(String),

    /// The request data could not be encoded.
    #[error("could not encode request body: {0}")]
    Encode(#[from] EncodeError),

    /// The body compressor failed.
    #[error("could not compress request body: {0}")]
    Compression(String),
}

/// Failures while assembling a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionBuildError {
    /// No base URL was given.
    #[error("a base URL is required")]
    MissingBaseUrl,

    /// No transport was given.
    #[error("a transport is required")]
    MissingTransport,

    /// The configuration is invalid.
    #[error(transparent)]
    InvalidConfig(#[from] DomainError),
}

/// The single terminal error of a request.
#[derive(Debug, Error)]
pub enum WebserviceError {
    /// Rendering failed; nothing was sent.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// No response was received, cancellation included.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The body did not decode into the destination type.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The body had the wrong shape.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl WebserviceError {
    /// Returns true if the request was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Cancelled))
    }

    /// Returns the HTTP status for `Http` errors.
    #[must_use]
    pub const fn status(&self) -> Option<HttpStatus> {
        match self {
            Self::Http(err) => Some(err.status),
            _ => None,
        }
    }

    /// Returns the HTTP error, if this is one.
    #[must_use]
    pub const fn as_http(&self) -> Option<&HttpError> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PayloadError> for WebserviceError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::Response(err) => Self::Response(err),
            PayloadError::Decode(err) => Self::Decode(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relay_domain::response::ResponseHeaders;

    #[test]
    fn test_payload_errors_are_flattened() {
        let err: WebserviceError = PayloadError::Response(ResponseError::EmptyResponse).into();
        assert!(matches!(err, WebserviceError::Response(ResponseError::EmptyResponse)));
        assert_eq!(err.to_string(), "The server did not return data.");
    }

    #[test]
    fn test_status_only_for_http_errors() {
        let http: WebserviceError =
            HttpError::new(HttpStatus::NotFound, ResponseHeaders::new(), None).into();
        assert_eq!(http.status(), Some(HttpStatus::NotFound));

        let cancelled: WebserviceError = TransportError::Cancelled.into();
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.status(), None);
    }
}
