//! Body compressor port

use std::fmt;
use std::io;

/// Compresses rendered request bodies.
pub trait BodyCompressor: Send + Sync + fmt::Debug {
    /// Value of the `Content-Encoding` header for compressed bodies.
    fn content_encoding(&self) -> &'static str;

    /// Compresses `body`.
    ///
    /// # Errors
    ///
    /// Returns the encoder's I/O error.
    fn compress(&self, body: &[u8]) -> io::Result<Vec<u8>>;
}
