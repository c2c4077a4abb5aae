//! The `Convertible` contract and its object-safe counterpart.

use std::any::Any;
use std::fmt;

use super::{DecodeContext, EncodeContext};
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::wire::FieldMap;

/// A domain type that builds itself from a [`DecodeContext`] and writes
/// itself into an [`EncodeContext`].
///
/// Implementations must round-trip: decoding the fields written by
/// `encode` yields the same logical value.
///
/// ```
/// use relay_domain::coding::{Convertible, DecodeContext, EncodeContext};
/// use relay_domain::error::{DecodeResult, EncodeResult};
///
/// struct Employee {
///     name: String,
///     salary: f64,
/// }
///
/// impl Convertible for Employee {
///     const TYPE_NAME: &'static str = "Employee";
///
///     fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self> {
///         Ok(Self {
///             name: ctx.decode("name")?,
///             salary: ctx.decode("salary")?,
///         })
///     }
///
///     fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
///         ctx.encode("name", &self.name);
///         ctx.encode("salary", &self.salary);
///         Ok(())
///     }
/// }
/// ```
pub trait Convertible: Sized {
    /// Name used in error messages and as the registry discriminator.
    const TYPE_NAME: &'static str;

    /// Builds the value from an object's fields.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if a field is missing, mistyped or rejected
    /// by a transformer.
    fn decode(ctx: &DecodeContext<'_>) -> DecodeResult<Self>;

    /// Writes the value's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a nested value cannot be encoded.
    fn encode(&self, ctx: &mut EncodeContext) -> EncodeResult<()>;

    /// Encodes the value into a fresh field map.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Convertible::encode`].
    fn to_fields(&self) -> EncodeResult<FieldMap> {
        let mut ctx = EncodeContext::new();
        self.encode(&mut ctx)?;
        Ok(ctx.into_fields())
    }
}

/// Object-safe view of a [`Convertible`] used where the concrete type is
/// only known at runtime, i.e. behind the type registry.
pub trait AnyConvertible: Any + Send + Sync + fmt::Debug {
    /// The registered name of the concrete type.
    fn type_name(&self) -> &'static str;

    /// Writes the concrete value's own fields (without a discriminator).
    ///
    /// # Errors
    ///
    /// Propagates any error from the concrete encoder.
    fn encode_fields(&self, ctx: &mut EncodeContext) -> EncodeResult<()>;

    /// Borrows the value as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Converts the boxed value into `Any` for downcasting by value.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T> AnyConvertible for T
where
    T: Convertible + Send + Sync + fmt::Debug + 'static,
{
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn encode_fields(&self, ctx: &mut EncodeContext) -> EncodeResult<()> {
        self.encode(ctx)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

impl dyn AnyConvertible {
    /// Returns a reference to the concrete value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: AnyConvertible>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns true if the concrete value is a `T`.
    #[must_use]
    pub fn is<T: AnyConvertible>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Unboxes the concrete value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedConcreteType`] if the value is not a `T`.
    pub fn downcast<T>(self: Box<Self>) -> DecodeResult<T>
    where
        T: Convertible + AnyConvertible,
    {
        let found = self.type_name();
        self.into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| DecodeError::UnexpectedConcreteType {
                expected: T::TYPE_NAME,
                found,
            })
    }
}
