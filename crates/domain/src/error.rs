//! Domain error types

use thiserror::Error;

use crate::wire::WireKind;

/// Domain-level errors that can occur during validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

/// Result type alias for domain validation.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised while building a typed value from wire values.
///
/// Any decode error aborts the whole enclosing decode; no partially
/// built object is ever returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// A required field is absent.
    #[error("missing field `{field}` in {type_name}")]
    MissingField {
        /// The absent key.
        field: String,
        /// The type being decoded.
        type_name: &'static str,
    },

    /// A field is present but holds an incompatible wire value.
    #[error("field `{field}` in {type_name} is {found}, expected {expected}")]
    IncorrectFieldType {
        /// The offending key (`key[index]` for array elements).
        field: String,
        /// Label of the expected wire type.
        expected: &'static str,
        /// The wire type actually found.
        found: WireKind,
        /// The type being decoded.
        type_name: &'static str,
    },

    /// A value transformer rejected the wire value.
    #[error("{message}")]
    FormattingFailed {
        /// The key the value was read from.
        field: String,
        /// The transformer's message.
        message: String,
    },

    /// A polymorphic payload names a type that is not registered.
    #[error("unknown discriminator `{tag}`")]
    UnknownDiscriminator {
        /// The unregistered tag.
        tag: String,
    },

    /// A polymorphic payload carries no discriminator.
    #[error("missing `{key}` discriminator")]
    MissingDiscriminator {
        /// The discriminator key that was looked up.
        key: &'static str,
    },

    /// A polymorphic payload decoded into a different concrete type than requested.
    #[error("expected {expected}, payload holds {found}")]
    UnexpectedConcreteType {
        /// The requested type.
        expected: &'static str,
        /// The type named by the discriminator.
        found: &'static str,
    },

    /// The top-level value is not an array where a collection was expected.
    #[error("invalid root type: expected array, found {found}")]
    InvalidRootType {
        /// The wire type actually found.
        found: WireKind,
    },

    /// A value is not an object where an object was expected.
    #[error("invalid leaf type: expected object, found {found}")]
    InvalidLeafType {
        /// The wire type actually found.
        found: WireKind,
    },
}

/// Result type alias for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while rendering a typed value to wire form.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// JSON cannot carry `NaN` or infinities.
    #[error("cannot encode non-finite number {0}")]
    NonFiniteNumber(f64),

    /// The JSON writer failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A caller-defined encoder rejected its value.
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for encoding.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors raised when a response body does not have the expected shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// The body is absent or empty.
    #[error("The server did not return data.")]
    EmptyResponse,

    /// The body is JSON of the wrong shape.
    #[error("The server returned an invalid response.")]
    UnexpectedType,

    /// The body is not JSON at all.
    #[error("The server returned malformed JSON: {0}")]
    MalformedJson(String),
}

/// Everything that can go wrong turning a response body into a typed payload.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PayloadError {
    /// The body has the wrong shape.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The body parsed but did not decode into the destination type.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
