//! Runtime type registry for discriminated payloads.

use std::collections::HashMap;
use std::fmt;

use super::{AnyConvertible, Convertible, DecodeContext, UserContext};
use crate::error::{DecodeError, DecodeResult};
use crate::wire::{FieldMap, WireValue};

/// Key under which a polymorphic object names its concrete type.
pub const DISCRIMINATOR_KEY: &str = "__type";

type DynDecoder = fn(&DecodeContext<'_>) -> DecodeResult<Box<dyn AnyConvertible>>;

fn decode_boxed<T>(ctx: &DecodeContext<'_>) -> DecodeResult<Box<dyn AnyConvertible>>
where
    T: Convertible + AnyConvertible,
{
    T::decode(ctx).map(|value| Box::new(value) as Box<dyn AnyConvertible>)
}

/// Maps type names to decoders.
///
/// Populate it once at startup and share it read-only afterwards.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    decoders: HashMap<&'static str, DynDecoder>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.decoders.keys().collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under its type name. Re-registering replaces the decoder.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Convertible + AnyConvertible,
    {
        self.decoders.insert(T::TYPE_NAME, decode_boxed::<T>);
        self
    }

    /// Builder-style [`TypeRegistry::register`].
    #[must_use]
    pub fn with<T>(mut self) -> Self
    where
        T: Convertible + AnyConvertible,
    {
        self.register::<T>();
        self
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decodes a statically known type. No discriminator is read.
    ///
    /// # Errors
    ///
    /// Any error raised by `T::decode`.
    pub fn deserialize<T: Convertible>(&self, fields: &FieldMap) -> DecodeResult<T> {
        self.deserialize_with_context(fields, None)
    }

    /// Like [`TypeRegistry::deserialize`] with a caller context.
    ///
    /// # Errors
    ///
    /// Any error raised by `T::decode`.
    pub fn deserialize_with_context<T: Convertible>(
        &self,
        fields: &FieldMap,
        user_context: Option<UserContext<'_>>,
    ) -> DecodeResult<T> {
        let ctx = DecodeContext::new(fields, self, T::TYPE_NAME).with_user_context(user_context);
        T::decode(&ctx)
    }

    /// Decodes an object whose concrete type is named by its discriminator.
    ///
    /// # Errors
    ///
    /// `MissingDiscriminator`, `IncorrectFieldType` for a non-string tag,
    /// `UnknownDiscriminator` for an unregistered tag, or the concrete
    /// type's decode error.
    pub fn deserialize_dyn(
        &self,
        fields: &FieldMap,
        user_context: Option<UserContext<'_>>,
    ) -> DecodeResult<Box<dyn AnyConvertible>> {
        let tag = match fields.get(DISCRIMINATOR_KEY) {
            None => {
                return Err(DecodeError::MissingDiscriminator {
                    key: DISCRIMINATOR_KEY,
                });
            }
            Some(WireValue::String(tag)) => tag,
            Some(other) => {
                return Err(DecodeError::IncorrectFieldType {
                    field: DISCRIMINATOR_KEY.to_string(),
                    expected: "string",
                    found: other.kind(),
                    type_name: "polymorphic object",
                });
            }
        };

        let (name, decoder) = self
            .decoders
            .get_key_value(tag.as_str())
            .ok_or_else(|| DecodeError::UnknownDiscriminator { tag: tag.clone() })?;

        let ctx = DecodeContext::new(fields, self, *name).with_user_context(user_context);
        decoder(&ctx)
    }

    /// Decodes a discriminated object and narrows it to `T`.
    ///
    /// # Errors
    ///
    /// As [`TypeRegistry::deserialize_dyn`], plus `UnexpectedConcreteType`.
    pub fn deserialize_as<T>(
        &self,
        fields: &FieldMap,
        user_context: Option<UserContext<'_>>,
    ) -> DecodeResult<T>
    where
        T: Convertible + AnyConvertible,
    {
        self.deserialize_dyn(fields, user_context)?.downcast::<T>()
    }
}
