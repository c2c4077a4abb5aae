//! Session Configuration Model
//!
//! Describes how a session talks to its remote API. Loading it from disk or
//! the environment is an infrastructure concern.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::request::HeaderFields;

/// Configuration for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,

    /// Whether request bodies are gzip-compressed.
    #[serde(default = "default_gzip_requests")]
    pub gzip_requests: bool,

    /// Maximum number of redirects the transport follows.
    #[serde(default = "default_redirect_limit")]
    pub redirect_limit: usize,

    /// Headers sent with every request.
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,

    /// Optional `User-Agent` override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Certificates (PEM or DER files) that become the only trusted TLS
    /// roots. Empty means the platform roots are used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pinned_certificates: Vec<PathBuf>,
}

const fn default_gzip_requests() -> bool {
    true
}

const fn default_redirect_limit() -> usize {
    10
}

impl SessionConfig {
    /// Creates a configuration with defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            gzip_requests: default_gzip_requests(),
            redirect_limit: default_redirect_limit(),
            default_headers: BTreeMap::new(),
            user_agent: None,
            pinned_certificates: Vec::new(),
        }
    }

    /// Parses and validates the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the URL does not parse or
    /// cannot serve as a base.
    pub fn base_url(&self) -> DomainResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| DomainError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if url.cannot_be_a_base() {
            return Err(DomainError::InvalidUrl(format!(
                "{}: cannot be a base URL",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// The default headers as header fields.
    #[must_use]
    pub fn header_fields(&self) -> HeaderFields {
        self.default_headers.iter().collect()
    }
}
