//! Field writers producing one object's fields.

use super::{AnyConvertible, Convertible, DISCRIMINATOR_KEY, WireScalar};
use crate::error::EncodeResult;
use crate::transform::ValueTransformer;
use crate::wire::{FieldMap, WireValue};

/// Accumulates the fields of one object being encoded.
///
/// Writing a key twice keeps the last value. Optional writers skip `None`
/// entirely rather than emitting `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeContext {
    fields: FieldMap,
}

impl EncodeContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a scalar.
    pub fn encode<T: WireScalar>(&mut self, key: impl Into<String>, value: &T) {
        self.fields.insert(key.into(), value.to_wire());
    }

    /// Writes a scalar if present.
    pub fn encode_opt<T: WireScalar>(&mut self, key: impl Into<String>, value: Option<&T>) {
        if let Some(value) = value {
            self.encode(key, value);
        }
    }

    /// Writes an array of scalars.
    pub fn encode_array<T: WireScalar>(&mut self, key: impl Into<String>, values: &[T]) {
        let items = values.iter().map(WireScalar::to_wire).collect();
        self.fields.insert(key.into(), WireValue::Array(items));
    }

    /// Writes a nested object.
    ///
    /// # Errors
    ///
    /// Propagates the nested encoder's error.
    pub fn encode_object<T: Convertible>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> EncodeResult<()> {
        let nested = value.to_fields()?;
        self.fields.insert(key.into(), WireValue::Object(nested));
        Ok(())
    }

    /// Writes a nested object if present.
    ///
    /// # Errors
    ///
    /// Propagates the nested encoder's error.
    pub fn encode_object_opt<T: Convertible>(
        &mut self,
        key: impl Into<String>,
        value: Option<&T>,
    ) -> EncodeResult<()> {
        match value {
            Some(value) => self.encode_object(key, value),
            None => Ok(()),
        }
    }

    /// Writes an array of nested objects.
    ///
    /// # Errors
    ///
    /// Propagates the first element's encoder error.
    pub fn encode_object_array<T: Convertible>(
        &mut self,
        key: impl Into<String>,
        values: &[T],
    ) -> EncodeResult<()> {
        let items = values
            .iter()
            .map(|value| value.to_fields().map(WireValue::Object))
            .collect::<EncodeResult<_>>()?;
        self.fields.insert(key.into(), WireValue::Array(items));
        Ok(())
    }

    /// Writes a domain value through a transformer's reverse direction.
    pub fn encode_with<X: ValueTransformer>(
        &mut self,
        key: impl Into<String>,
        value: &X::Domain,
        transformer: &X,
    ) {
        let raw = transformer.reverse_transformed_value(value);
        self.encode(key, &raw);
    }

    /// Writes a transformed value if present.
    pub fn encode_opt_with<X: ValueTransformer>(
        &mut self,
        key: impl Into<String>,
        value: Option<&X::Domain>,
        transformer: &X,
    ) {
        if let Some(value) = value {
            self.encode_with(key, value, transformer);
        }
    }

    /// Writes an array of domain values through a transformer.
    pub fn encode_array_with<X: ValueTransformer>(
        &mut self,
        key: impl Into<String>,
        values: &[X::Domain],
        transformer: &X,
    ) {
        let items = values
            .iter()
            .map(|value| transformer.reverse_transformed_value(value).to_wire())
            .collect();
        self.fields.insert(key.into(), WireValue::Array(items));
    }

    /// Writes a runtime-typed object together with its discriminator.
    ///
    /// # Errors
    ///
    /// Propagates the concrete encoder's error.
    pub fn encode_polymorphic(
        &mut self,
        key: impl Into<String>,
        value: &dyn AnyConvertible,
    ) -> EncodeResult<()> {
        let nested = polymorphic_fields(value)?;
        self.fields.insert(key.into(), WireValue::Object(nested));
        Ok(())
    }

    /// Writes an array of runtime-typed objects, each with its discriminator.
    ///
    /// # Errors
    ///
    /// Propagates the first element's encoder error.
    pub fn encode_polymorphic_array(
        &mut self,
        key: impl Into<String>,
        values: &[Box<dyn AnyConvertible>],
    ) -> EncodeResult<()> {
        let items = values
            .iter()
            .map(|value| polymorphic_fields(value.as_ref()).map(WireValue::Object))
            .collect::<EncodeResult<_>>()?;
        self.fields.insert(key.into(), WireValue::Array(items));
        Ok(())
    }

    /// Writes an already-built wire value verbatim.
    pub fn encode_raw(&mut self, key: impl Into<String>, value: WireValue) {
        self.fields.insert(key.into(), value);
    }

    /// Returns the fields written so far.
    #[must_use]
    pub const fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Consumes the context, returning its fields.
    #[must_use]
    pub fn into_fields(self) -> FieldMap {
        self.fields
    }
}

/// Encodes a runtime-typed value as a root object carrying its discriminator.
///
/// # Errors
///
/// Propagates the concrete encoder's error.
pub fn polymorphic_fields(value: &dyn AnyConvertible) -> EncodeResult<FieldMap> {
    let mut ctx = EncodeContext::new();
    value.encode_fields(&mut ctx)?;
    ctx.encode(DISCRIMINATOR_KEY, &value.type_name().to_string());
    Ok(ctx.into_fields())
}
