//! Native wire scalars

use crate::wire::WireValue;

/// A Rust type that maps one-to-one onto a JSON scalar.
///
/// `from_wire(&v.to_wire()) == Some(v)` holds for every implementor.
pub trait WireScalar: Sized {
    /// Label used as `expected` in type mismatch errors.
    const LABEL: &'static str;

    /// Reads the value, or `None` if the wire value has another shape or
    /// does not fit.
    fn from_wire(value: &WireValue) -> Option<Self>;

    /// Writes the value.
    fn to_wire(&self) -> WireValue;
}

impl WireScalar for bool {
    const LABEL: &'static str = "bool";

    fn from_wire(value: &WireValue) -> Option<Self> {
        match value {
            WireValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Bool(*self)
    }
}

macro_rules! integer_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireScalar for $ty {
                const LABEL: &'static str = "int";

                fn from_wire(value: &WireValue) -> Option<Self> {
                    match value {
                        WireValue::Int(n) => Self::try_from(*n).ok(),
                        _ => None,
                    }
                }

                fn to_wire(&self) -> WireValue {
                    WireValue::Int(i64::from(*self))
                }
            }
        )*
    };
}

// u64 and usize are left out: values above i64::MAX have no integral wire form.
integer_scalar!(i8, i16, i32, i64, u8, u16, u32);

impl WireScalar for f64 {
    const LABEL: &'static str = "double";

    #[allow(clippy::cast_precision_loss)]
    fn from_wire(value: &WireValue) -> Option<Self> {
        match value {
            WireValue::Float(f) => Some(*f),
            WireValue::Int(n) => Some(*n as Self),
            _ => None,
        }
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Float(*self)
    }
}

impl WireScalar for f32 {
    const LABEL: &'static str = "float";

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn from_wire(value: &WireValue) -> Option<Self> {
        match value {
            WireValue::Float(f) => Some(*f as Self),
            WireValue::Int(n) => Some(*n as Self),
            _ => None,
        }
    }

    fn to_wire(&self) -> WireValue {
        WireValue::Float(f64::from(*self))
    }
}

impl WireScalar for String {
    const LABEL: &'static str = "string";

    fn from_wire(value: &WireValue) -> Option<Self> {
        match value {
            WireValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn to_wire(&self) -> WireValue {
        WireValue::String(self.clone())
    }
}

/// Untyped passthrough: any wire value is accepted as-is.
impl WireScalar for WireValue {
    const LABEL: &'static str = "any";

    fn from_wire(value: &WireValue) -> Option<Self> {
        Some(value.clone())
    }

    fn to_wire(&self) -> WireValue {
        self.clone()
    }
}
