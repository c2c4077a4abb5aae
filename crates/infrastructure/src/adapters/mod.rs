//! Port adapters for the transport and body compression.

mod gzip_compressor;
mod reqwest_transport;

pub use gzip_compressor::GzipCompressor;
pub use reqwest_transport::{DEFAULT_REDIRECT_LIMIT, DEFAULT_USER_AGENT, ReqwestTransport};
