//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the pipeline and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod compressor;
mod secure_store;
mod transport;

pub use compressor::BodyCompressor;
pub use secure_store::{SecureStore, StoreError, StoredRecord};
pub use transport::{HttpTransport, TransportError, TransportRequest, TransportResponse};
