//! Wire values
//!
//! The closed set of shapes a JSON document can take. Every decode site
//! matches on [`WireValue`] exhaustively instead of downcasting an opaque
//! container.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::{EncodeError, EncodeResult};

/// An object's fields, keyed by name.
///
/// A `BTreeMap` keeps rendered documents deterministic.
pub type FieldMap = BTreeMap<String, WireValue>;

/// A value directly expressible in JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WireValue {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON `true` / `false`.
    Bool(bool),
    /// A number without a fractional part that fits into `i64`.
    Int(i64),
    /// Any other number.
    Float(f64),
    /// A JSON string.
    String(String),
    /// A JSON array.
    Array(Vec<WireValue>),
    /// A JSON object.
    Object(FieldMap),
}

/// The shape of a [`WireValue`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Integral number
    Int,
    /// Floating point number
    Float,
    /// String
    String,
    /// Array
    Array,
    /// Object
    Object,
}

impl WireKind {
    /// Returns the label used for this kind in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "double",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WireValue {
    /// Returns the shape of this value.
    #[must_use]
    pub const fn kind(&self) -> WireKind {
        match self {
            Self::Null => WireKind::Null,
            Self::Bool(_) => WireKind::Bool,
            Self::Int(_) => WireKind::Int,
            Self::Float(_) => WireKind::Float,
            Self::String(_) => WireKind::String,
            Self::Array(_) => WireKind::Array,
            Self::Object(_) => WireKind::Object,
        }
    }

    /// Returns the fields if this value is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&FieldMap> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the elements if this value is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true if this value is `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts a parsed `serde_json` value.
    ///
    /// Integers beyond the `i64` range are kept as floating point numbers.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| n.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from_json).collect()),
            Value::Object(fields) => Self::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Self::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Converts this value into a `serde_json` value.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::NonFiniteNumber`] for `NaN` or infinite floats,
    /// which JSON cannot represent.
    pub fn to_json(&self) -> EncodeResult<Value> {
        Ok(match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(n) => Value::Number(Number::from(*n)),
            Self::Float(f) => Value::Number(
                Number::from_f64(*f).ok_or(EncodeError::NonFiniteNumber(*f))?,
            ),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => {
                Value::Array(items.iter().map(Self::to_json).collect::<EncodeResult<_>>()?)
            }
            Self::Object(fields) => {
                let mut map = Map::with_capacity(fields.len());
                for (key, value) in fields {
                    map.insert(key.clone(), value.to_json()?);
                }
                Value::Object(map)
            }
        })
    }

    /// Parses a JSON document, scalar fragments included.
    ///
    /// # Errors
    ///
    /// Returns the parser error if `bytes` is not valid JSON.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<Value>(bytes).map(Self::from_json)
    }

    /// Renders this value as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the value contains a non-finite number.
    pub fn to_json_vec(&self) -> EncodeResult<Vec<u8>> {
        serde_json::to_vec(&self.to_json()?).map_err(|e| EncodeError::Serialization(e.to_string()))
    }
}

impl From<Value> for WireValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl From<FieldMap> for WireValue {
    fn from(fields: FieldMap) -> Self {
        Self::Object(fields)
    }
}
