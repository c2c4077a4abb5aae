//! Session configuration loading.
//!
//! Configuration is read from a JSON or YAML file and can be overridden
//! through `RELAY_*` environment variables.

use std::path::Path;
use std::sync::Arc;

use relay_application::error::SessionBuildError;
use relay_application::ports::TransportError;
use relay_application::session::{Session, SessionBuilder};
use relay_domain::config::SessionConfig;
use thiserror::Error;
use tracing::debug;

use crate::adapters::{GzipCompressor, ReqwestTransport};
use crate::serialization::from_json_bytes;

/// Overrides `base_url`.
pub const ENV_BASE_URL: &str = "RELAY_BASE_URL";
/// Overrides `gzip_requests` (`true`/`false`/`1`/`0`).
pub const ENV_GZIP_REQUESTS: &str = "RELAY_GZIP_REQUESTS";
/// Overrides `redirect_limit`.
pub const ENV_REDIRECT_LIMIT: &str = "RELAY_REDIRECT_LIMIT";
/// Overrides `user_agent`.
pub const ENV_USER_AGENT: &str = "RELAY_USER_AGENT";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be parsed.
    #[error("could not parse config file: {0}")]
    Parse(String),

    /// An override holds an unusable value.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// The variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The transport could not be created.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session could not be built.
    #[error(transparent)]
    Session(#[from] SessionBuildError),
}

/// Reads a configuration file. Files ending in `.yaml` or `.yml` are parsed
/// as YAML, everything else as JSON.
///
/// Relative pinned certificate paths are resolved against the file's
/// directory.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let content = tokio::fs::read(path).await?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let mut config: SessionConfig = if is_yaml {
        serde_yaml::from_slice(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
    } else {
        from_json_bytes(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
    };
    if let Some(dir) = path.parent() {
        for certificate in &mut config.pinned_certificates {
            if certificate.is_relative() {
                *certificate = dir.join(&*certificate);
            }
        }
    }
    debug!(path = %path.display(), "Loaded session config");
    Ok(config)
}

/// Applies `RELAY_*` environment variables on top of `config`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if a variable cannot be parsed.
pub fn apply_env_overrides(config: SessionConfig) -> Result<SessionConfig, ConfigError> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Applies overrides looked up through `lookup`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if a value cannot be parsed.
pub fn apply_overrides(
    mut config: SessionConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SessionConfig, ConfigError> {
    if let Some(value) = lookup(ENV_BASE_URL) {
        config.base_url = value;
    }
    if let Some(value) = lookup(ENV_GZIP_REQUESTS) {
        config.gzip_requests = parse_bool(&value).ok_or(ConfigError::InvalidValue {
            key: ENV_GZIP_REQUESTS,
            value,
        })?;
    }
    if let Some(value) = lookup(ENV_REDIRECT_LIMIT) {
        config.redirect_limit = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: ENV_REDIRECT_LIMIT,
            value: value.clone(),
        })?;
    }
    if let Some(value) = lookup(ENV_USER_AGENT) {
        config.user_agent = Some(value);
    }
    Ok(config)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builds a session backed by reqwest, gzip-compressing bodies when the
/// configuration asks for it.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the transport cannot be
/// created.
pub fn session_from_config(config: &SessionConfig) -> Result<Session, ConfigError> {
    let transport = ReqwestTransport::from_config(config)?;
    let mut builder = SessionBuilder::from_config(config)?.transport(Arc::new(transport));
    if config.gzip_requests {
        builder = builder.compressor(Arc::new(GzipCompressor::new()));
    }
    Ok(builder.build()?)
}
