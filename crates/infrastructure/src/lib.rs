//! Relay Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading and
//! tracing setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;
pub mod telemetry;

pub use adapters::{GzipCompressor, ReqwestTransport};
pub use config::{
    ConfigError, apply_env_overrides, apply_overrides, load_config, session_from_config,
};
pub use persistence::{FileSecureStore, MemorySecureStore};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
pub use telemetry::{init_tracing, try_init_tracing};
