//! JSON helpers for files written by the infrastructure adapters.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),
}

/// Serializes a value to stable, human-readable JSON bytes.
///
/// Output uses 2-space indentation and ends with a newline. Key order is
/// that of the source type, so maps should be `BTreeMap`s.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Deserializes JSON from bytes, pretty-printed or minified.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_stable_output_shape() {
        let mut map = BTreeMap::new();
        map.insert("zebra", 1);
        map.insert("apple", 2);

        let json = String::from_utf8(to_json_stable_bytes(&map).unwrap()).unwrap();

        assert_eq!(json, "{\n  \"apple\": 2,\n  \"zebra\": 1\n}\n");
    }

    #[test]
    fn test_round_trip() {
        let mut original = BTreeMap::new();
        original.insert("key".to_string(), "value".to_string());

        let bytes = to_json_stable_bytes(&original).unwrap();
        let restored: BTreeMap<String, String> = from_json_bytes(&bytes).unwrap();

        assert_eq!(original, restored);
    }

    #[test]
    fn test_invalid_json() {
        let result: Result<serde_json::Value, _> = from_json_bytes(br#"{"invalid": }"#);
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
