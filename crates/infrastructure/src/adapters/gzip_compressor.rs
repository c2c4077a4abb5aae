//! Gzip request body compression.

use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
use relay_application::ports::BodyCompressor;

/// Compresses bodies with gzip and marks them `Content-Encoding: gzip`.
#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    /// Creates a compressor using the default compression level.
    #[must_use]
    pub fn new() -> Self {
        Self::with_level(Compression::default())
    }

    /// Creates a compressor using `level`.
    #[must_use]
    pub const fn with_level(level: Compression) -> Self {
        Self { level }
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyCompressor for GzipCompressor {
    fn content_encoding(&self) -> &'static str {
        "gzip"
    }

    fn compress(&self, body: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(body.len() / 2), self.level);
        encoder.write_all(body)?;
        encoder.finish()
    }
}
