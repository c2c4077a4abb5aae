//! Relay Application - Pipeline and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the transport, body compressor and secure store
//! - Request rendering and response parsing
//! - The session pipeline, request handles and cancellation
//! - The keychain service and reachability signal

pub mod cancellation;
pub mod error;
pub mod handle;
pub mod keychain;
pub mod parser;
pub mod ports;
pub mod reachability;
pub mod render;
pub mod result_ext;
pub mod session;

pub use cancellation::{CancellationReceiver, CancellationToken};
pub use error::{RenderError, SessionBuildError, WebserviceError};
pub use handle::RequestHandle;
pub use keychain::{Keychain, KeychainError};
pub use ports::{
    BodyCompressor, HttpTransport, SecureStore, StoreError, StoredRecord, TransportError,
    TransportRequest, TransportResponse,
};
pub use reachability::{Connection, ReachabilityService};
pub use render::render_request;
pub use result_ext::{ResponseResult, ResponseResultExt};
pub use session::{Session, SessionBuilder};
