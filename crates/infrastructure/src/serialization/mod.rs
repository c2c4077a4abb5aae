//! Stable JSON serialization for files on disk.
//!
//! Keeps stored files readable and diff-friendly:
//! - Sorted object keys (via `BTreeMap` in the stored types)
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::*;
