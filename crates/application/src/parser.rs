//! Response parsing strategies
//!
//! The session picks one strategy per destination type at call time and
//! runs it on the worker task, never on the caller's.

use relay_domain::coding::{AnyConvertible, Convertible, TypeRegistry, UserContext, WireScalar};
use relay_domain::error::PayloadError;
use relay_domain::response::payload;
use relay_domain::wire::WireValue;

/// Everything a parser may look at.
#[derive(Debug, Clone, Copy)]
pub struct ParseInput<'a> {
    /// Raw response body.
    pub body: Option<&'a [u8]>,
    /// Registry for polymorphic payloads.
    pub registry: &'a TypeRegistry,
    /// The request's decode context.
    pub context: Option<UserContext<'a>>,
}

/// A parsing strategy producing `O`.
pub type Parser<O> = fn(ParseInput<'_>) -> Result<O, PayloadError>;

/// Ignores the body; any or no body is fine.
///
/// # Errors
///
/// Never fails.
pub const fn unit(_input: ParseInput<'_>) -> Result<(), PayloadError> {
    Ok(())
}

/// Single JSON scalar.
///
/// # Errors
///
/// See [`payload::parse_fragment`].
pub fn fragment<T: WireScalar>(input: ParseInput<'_>) -> Result<T, PayloadError> {
    payload::parse_fragment(input.body)
}

/// One JSON object.
///
/// # Errors
///
/// See [`payload::parse_object`].
pub fn object<T: Convertible>(input: ParseInput<'_>) -> Result<T, PayloadError> {
    payload::parse_object(input.body, input.registry, input.context)
}

/// A JSON array of objects.
///
/// # Errors
///
/// See [`payload::parse_collection`].
pub fn collection<T: Convertible>(input: ParseInput<'_>) -> Result<Vec<T>, PayloadError> {
    payload::parse_collection(input.body, input.registry, input.context)
}

/// A discriminated JSON object.
///
/// # Errors
///
/// See [`payload::parse_polymorphic`].
pub fn polymorphic(input: ParseInput<'_>) -> Result<Box<dyn AnyConvertible>, PayloadError> {
    payload::parse_polymorphic(input.body, input.registry, input.context)
}

/// A JSON array of discriminated objects.
///
/// # Errors
///
/// See [`payload::parse_polymorphic_collection`].
pub fn polymorphic_collection(
    input: ParseInput<'_>,
) -> Result<Vec<Box<dyn AnyConvertible>>, PayloadError> {
    payload::parse_polymorphic_collection(input.body, input.registry, input.context)
}

/// Any JSON value, untyped.
///
/// # Errors
///
/// See [`payload::parse_json`].
pub fn json(input: ParseInput<'_>) -> Result<WireValue, PayloadError> {
    payload::parse_json(input.body)
}
