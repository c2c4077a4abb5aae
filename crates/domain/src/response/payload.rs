//! Response body parsers, one per destination shape.
//!
//! An absent body and an empty body are treated alike.

use crate::coding::{AnyConvertible, Convertible, TypeRegistry, UserContext, WireScalar};
use crate::error::{DecodeError, PayloadError, ResponseError};
use crate::wire::{FieldMap, WireValue};

/// Parses the body as any JSON value.
///
/// # Errors
///
/// `EmptyResponse` for an absent or empty body, `MalformedJson` otherwise.
pub fn parse_json(body: Option<&[u8]>) -> Result<WireValue, PayloadError> {
    let bytes = body
        .filter(|bytes| !bytes.is_empty())
        .ok_or(ResponseError::EmptyResponse)?;
    WireValue::from_json_slice(bytes)
        .map_err(|err| ResponseError::MalformedJson(err.to_string()).into())
}

/// Parses a single JSON scalar.
///
/// # Errors
///
/// As [`parse_json`], plus `UnexpectedType` when the value is not a `T`.
pub fn parse_fragment<T: WireScalar>(body: Option<&[u8]>) -> Result<T, PayloadError> {
    let value = parse_json(body)?;
    T::from_wire(&value).ok_or_else(|| ResponseError::UnexpectedType.into())
}

/// Parses a JSON object into `T`.
///
/// # Errors
///
/// As [`parse_json`], `InvalidLeafType` for a non-object, or `T`'s decode error.
pub fn parse_object<T: Convertible>(
    body: Option<&[u8]>,
    registry: &TypeRegistry,
    user_context: Option<UserContext<'_>>,
) -> Result<T, PayloadError> {
    let value = parse_json(body)?;
    let fields = leaf(&value)?;
    Ok(registry.deserialize_with_context(fields, user_context)?)
}

/// Parses a JSON array of objects into `Vec<T>`.
///
/// # Errors
///
/// As [`parse_json`], `InvalidRootType` for a non-array, `InvalidLeafType`
/// for a non-object element, or the first element's decode error.
pub fn parse_collection<T: Convertible>(
    body: Option<&[u8]>,
    registry: &TypeRegistry,
    user_context: Option<UserContext<'_>>,
) -> Result<Vec<T>, PayloadError> {
    let value = parse_json(body)?;
    root(&value)?
        .iter()
        .map(|item| -> Result<T, PayloadError> {
            let fields = leaf(item)?;
            Ok(registry.deserialize_with_context(fields, user_context)?)
        })
        .collect()
}

/// Parses a discriminated JSON object through the registry.
///
/// # Errors
///
/// As [`parse_object`], plus the registry's discriminator errors.
pub fn parse_polymorphic(
    body: Option<&[u8]>,
    registry: &TypeRegistry,
    user_context: Option<UserContext<'_>>,
) -> Result<Box<dyn AnyConvertible>, PayloadError> {
    let value = parse_json(body)?;
    let fields = leaf(&value)?;
    Ok(registry.deserialize_dyn(fields, user_context)?)
}

/// Parses a JSON array of discriminated objects.
///
/// # Errors
///
/// As [`parse_collection`], plus the registry's discriminator errors.
pub fn parse_polymorphic_collection(
    body: Option<&[u8]>,
    registry: &TypeRegistry,
    user_context: Option<UserContext<'_>>,
) -> Result<Vec<Box<dyn AnyConvertible>>, PayloadError> {
    let value = parse_json(body)?;
    root(&value)?
        .iter()
        .map(|item| -> Result<Box<dyn AnyConvertible>, PayloadError> {
            let fields = leaf(item)?;
            Ok(registry.deserialize_dyn(fields, user_context)?)
        })
        .collect()
}

fn leaf(value: &WireValue) -> Result<&FieldMap, DecodeError> {
    value.as_object().ok_or(DecodeError::InvalidLeafType {
        found: value.kind(),
    })
}

fn root(value: &WireValue) -> Result<&[WireValue], DecodeError> {
    value.as_array().ok_or(DecodeError::InvalidRootType {
        found: value.kind(),
    })
}
