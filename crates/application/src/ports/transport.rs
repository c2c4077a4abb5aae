//! HTTP transport port
//!
//! The transport is a black box: given a rendered request it yields a
//! status, headers and an optional body, or a transport failure.

use std::time::Duration;

use async_trait::async_trait;
use relay_domain::request::{HeaderFields, HttpMethod};
use thiserror::Error;
use url::Url;

/// A fully rendered request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL, query included.
    pub url: Url,
    /// Final header set.
    pub headers: HeaderFields,
    /// Encoded (and possibly compressed) body.
    pub body: Option<Vec<u8>>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// What the transport received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric status code.
    pub status: u16,
    /// Header pairs as received.
    pub headers: Vec<(String, String)>,
    /// Body bytes; `None` when the transport saw no body.
    pub body: Option<Vec<u8>>,
}

impl TransportResponse {
    /// Creates a response with a body and no headers.
    #[must_use]
    pub fn new(status: u16, body: Option<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request timed out.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// The host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// The configured limit.
        max: usize,
    },

    /// A pinned certificate could not be loaded.
    #[error("invalid certificate {path}: {message}")]
    InvalidCertificate {
        /// Where the certificate was read from.
        path: String,
        /// Why it was rejected.
        message: String,
    },

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Port for performing one HTTP exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and waits for the complete response.
    ///
    /// Non-success statuses are not errors at this level.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response was received.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
