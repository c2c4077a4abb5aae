//! Typed field accessors over one object's fields.

use std::any::Any;

use super::{AnyConvertible, Convertible, TypeRegistry, WireScalar};
use crate::error::{DecodeError, DecodeResult};
use crate::transform::ValueTransformer;
use crate::wire::{FieldMap, WireValue};

/// Opaque value a caller threads through a whole decode.
pub type UserContext<'a> = &'a (dyn Any + Send + Sync + 'static);

/// Read-only view of one object's fields during a decode.
///
/// Every nested decode receives the same registry and user context.
/// Reads never mutate the underlying map.
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    fields: &'a FieldMap,
    registry: &'a TypeRegistry,
    user_context: Option<UserContext<'a>>,
    type_name: &'static str,
}

impl std::fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeContext")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("has_user_context", &self.user_context.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> DecodeContext<'a> {
    /// Creates a context for decoding `type_name` from `fields`.
    #[must_use]
    pub const fn new(fields: &'a FieldMap, registry: &'a TypeRegistry, type_name: &'static str) -> Self {
        Self {
            fields,
            registry,
            user_context: None,
            type_name,
        }
    }

    /// Attaches the caller's opaque context.
    #[must_use]
    pub const fn with_user_context(mut self, user_context: Option<UserContext<'a>>) -> Self {
        self.user_context = user_context;
        self
    }

    /// Returns the caller's context if it is a `C`.
    #[must_use]
    pub fn user_context<C: Any>(&self) -> Option<&'a C> {
        self.user_context.and_then(|ctx| ctx.downcast_ref::<C>())
    }

    /// Returns the raw user context.
    #[must_use]
    pub const fn raw_user_context(&self) -> Option<UserContext<'a>> {
        self.user_context
    }

    /// Returns the registry used for polymorphic fields.
    #[must_use]
    pub const fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Returns the underlying fields.
    #[must_use]
    pub const fn fields(&self) -> &'a FieldMap {
        self.fields
    }

    /// Returns the name of the type being decoded.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if `key` is present, `null` included.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    // native scalars

    /// Decodes a required scalar field.
    ///
    /// # Errors
    ///
    /// `MissingField` if absent, `IncorrectFieldType` if the wire value
    /// does not fit `T`.
    pub fn decode<T: WireScalar>(&self, key: &str) -> DecodeResult<T> {
        self.scalar(key, self.required(key)?)
    }

    /// Decodes an optional scalar field; absence yields `None`.
    ///
    /// A present `null` is a type mismatch, not an absent value.
    ///
    /// # Errors
    ///
    /// `IncorrectFieldType` if present but not a `T`.
    pub fn decode_opt<T: WireScalar>(&self, key: &str) -> DecodeResult<Option<T>> {
        self.fields
            .get(key)
            .map(|value| self.scalar(key, value))
            .transpose()
    }

    /// Decodes a required array of scalars. The first bad element fails the
    /// whole field.
    ///
    /// # Errors
    ///
    /// `MissingField`, or `IncorrectFieldType` for a non-array or a bad element.
    pub fn decode_array<T: WireScalar>(&self, key: &str) -> DecodeResult<Vec<T>> {
        self.scalar_array(key, self.required(key)?)
    }

    /// Decodes an optional array of scalars.
    ///
    /// # Errors
    ///
    /// `IncorrectFieldType` for a non-array or a bad element.
    pub fn decode_array_opt<T: WireScalar>(&self, key: &str) -> DecodeResult<Option<Vec<T>>> {
        self.fields
            .get(key)
            .map(|value| self.scalar_array(key, value))
            .transpose()
    }

    // nested convertibles

    /// Decodes a required nested object.
    ///
    /// # Errors
    ///
    /// `MissingField`, `IncorrectFieldType` for a non-object, or any error
    /// raised by the nested decode.
    pub fn decode_object<T: Convertible>(&self, key: &str) -> DecodeResult<T> {
        self.object(key, self.required(key)?)
    }

    /// Decodes an optional nested object.
    ///
    /// # Errors
    ///
    /// `IncorrectFieldType` for a non-object, or any nested error.
    pub fn decode_object_opt<T: Convertible>(&self, key: &str) -> DecodeResult<Option<T>> {
        self.fields
            .get(key)
            .map(|value| self.object(key, value))
            .transpose()
    }

    /// Decodes a required array of nested objects.
    ///
    /// # Errors
    ///
    /// `MissingField`, `IncorrectFieldType`, or the first element's error.
    pub fn decode_object_array<T: Convertible>(&self, key: &str) -> DecodeResult<Vec<T>> {
        self.object_array(key, self.required(key)?)
    }

    /// Decodes an optional array of nested objects.
    ///
    /// # Errors
    ///
    /// `IncorrectFieldType`, or the first element's error.
    pub fn decode_object_array_opt<T: Convertible>(
        &self,
        key: &str,
    ) -> DecodeResult<Option<Vec<T>>> {
        self.fields
            .get(key)
            .map(|value| self.object_array(key, value))
            .transpose()
    }

    // transformers

    /// Reads the transformer's wire type under the usual missing/mismatch
    /// rules, then transforms it.
    ///
    /// # Errors
    ///
    /// `MissingField`, `IncorrectFieldType`, or `FormattingFailed` carrying
    /// the transformer's message.
    pub fn decode_with<X: ValueTransformer>(
        &self,
        key: &str,
        transformer: &X,
    ) -> DecodeResult<X::Domain> {
        let raw = self.decode::<X::Wire>(key)?;
        Self::transform(key, transformer, raw)
    }

    /// Optional variant of [`DecodeContext::decode_with`].
    ///
    /// # Errors
    ///
    /// `IncorrectFieldType` or `FormattingFailed`.
    pub fn decode_opt_with<X: ValueTransformer>(
        &self,
        key: &str,
        transformer: &X,
    ) -> DecodeResult<Option<X::Domain>> {
        self.decode_opt::<X::Wire>(key)?
            .map(|raw| Self::transform(key, transformer, raw))
            .transpose()
    }

    /// Decodes an array whose elements each pass through the transformer.
    ///
    /// # Errors
    ///
    /// As [`DecodeContext::decode_array`], plus `FormattingFailed`.
    pub fn decode_array_with<X: ValueTransformer>(
        &self,
        key: &str,
        transformer: &X,
    ) -> DecodeResult<Vec<X::Domain>> {
        self.decode_array::<X::Wire>(key)?
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Self::transform(&format!("{key}[{index}]"), transformer, raw))
            .collect()
    }

    // polymorphic

    /// Decodes a nested object whose concrete type is named by its
    /// discriminator.
    ///
    /// # Errors
    ///
    /// `MissingField`, `IncorrectFieldType`, `MissingDiscriminator`,
    /// `UnknownDiscriminator`, or the concrete type's decode error.
    pub fn decode_polymorphic(&self, key: &str) -> DecodeResult<Box<dyn AnyConvertible>> {
        let fields = self.object_fields(key, self.required(key)?)?;
        self.registry.deserialize_dyn(fields, self.user_context)
    }

    /// Like [`DecodeContext::decode_polymorphic`] but narrows to `T`.
    ///
    /// # Errors
    ///
    /// Additionally `UnexpectedConcreteType` if the payload names another type.
    pub fn decode_polymorphic_as<T>(&self, key: &str) -> DecodeResult<T>
    where
        T: Convertible + AnyConvertible,
    {
        self.decode_polymorphic(key)?.downcast::<T>()
    }

    /// Decodes an array of discriminated objects.
    ///
    /// # Errors
    ///
    /// As [`DecodeContext::decode_polymorphic`], for the first bad element.
    pub fn decode_polymorphic_array(
        &self,
        key: &str,
    ) -> DecodeResult<Vec<Box<dyn AnyConvertible>>> {
        let items = self.array(key, self.required(key)?)?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let fields = self.object_fields(&format!("{key}[{index}]"), item)?;
                self.registry.deserialize_dyn(fields, self.user_context)
            })
            .collect()
    }

    // helpers

    fn required(&self, key: &str) -> DecodeResult<&'a WireValue> {
        self.fields.get(key).ok_or_else(|| DecodeError::MissingField {
            field: key.to_string(),
            type_name: self.type_name,
        })
    }

    fn mismatch(&self, field: &str, expected: &'static str, found: &WireValue) -> DecodeError {
        DecodeError::IncorrectFieldType {
            field: field.to_string(),
            expected,
            found: found.kind(),
            type_name: self.type_name,
        }
    }

    fn scalar<T: WireScalar>(&self, field: &str, value: &WireValue) -> DecodeResult<T> {
        T::from_wire(value).ok_or_else(|| self.mismatch(field, T::LABEL, value))
    }

    fn array(&self, field: &str, value: &'a WireValue) -> DecodeResult<&'a [WireValue]> {
        match value {
            WireValue::Array(items) => Ok(items),
            other => Err(self.mismatch(field, "array", other)),
        }
    }

    fn scalar_array<T: WireScalar>(&self, key: &str, value: &'a WireValue) -> DecodeResult<Vec<T>> {
        self.array(key, value)?
            .iter()
            .enumerate()
            .map(|(index, item)| self.scalar(&format!("{key}[{index}]"), item))
            .collect()
    }

    fn object_fields(&self, field: &str, value: &'a WireValue) -> DecodeResult<&'a FieldMap> {
        match value {
            WireValue::Object(fields) => Ok(fields),
            other => Err(self.mismatch(field, "object", other)),
        }
    }

    fn object<T: Convertible>(&self, field: &str, value: &'a WireValue) -> DecodeResult<T> {
        let fields = self.object_fields(field, value)?;
        T::decode(&self.nested(fields, T::TYPE_NAME))
    }

    fn object_array<T: Convertible>(&self, key: &str, value: &'a WireValue) -> DecodeResult<Vec<T>> {
        self.array(key, value)?
            .iter()
            .enumerate()
            .map(|(index, item)| self.object(&format!("{key}[{index}]"), item))
            .collect()
    }

    const fn nested(&self, fields: &'a FieldMap, type_name: &'static str) -> Self {
        Self {
            fields,
            registry: self.registry,
            user_context: self.user_context,
            type_name,
        }
    }

    fn transform<X: ValueTransformer>(
        field: &str,
        transformer: &X,
        raw: X::Wire,
    ) -> DecodeResult<X::Domain> {
        transformer
            .transformed_value(raw)
            .map_err(|err| DecodeError::FormattingFailed {
                field: field.to_string(),
                message: err.to_string(),
            })
    }
}
