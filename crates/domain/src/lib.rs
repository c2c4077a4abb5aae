//! Relay Domain - Core data-exchange types
//!
//! This crate defines wire values, the typed decode/encode machinery, the
//! request and response model and the secure item types.
//! All types here are pure Rust with no I/O dependencies.

pub mod coding;
pub mod config;
pub mod error;
pub mod keychain;
pub mod request;
pub mod response;
pub mod transform;
pub mod wire;

pub use coding::{
    AnyConvertible, Convertible, DISCRIMINATOR_KEY, DecodeContext, EncodeContext, TypeRegistry,
    WireScalar,
};
pub use config::SessionConfig;
pub use error::{
    DecodeError, DecodeResult, DomainError, DomainResult, EncodeError, EncodeResult, PayloadError,
    ResponseError,
};
pub use keychain::{
    Accessibility, GenericCredentials, InternetCredentials, ItemIdentity, StoredItem,
};
pub use request::{BodyShape, HeaderFields, HttpMethod, QueryParam, QueryParams, Request};
pub use response::{HttpError, HttpStatus, Response, ResponseHeaders};
pub use transform::{Iso8601DateTimeTransformer, TransformError, UrlTransformer, ValueTransformer};
pub use wire::{FieldMap, WireKind, WireValue};
