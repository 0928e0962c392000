//! Element data types a field buffer may hold.

use std::fmt;

/// Default floating-point type for physical quantities.
pub type Real = f64;

/// Runtime tag for a field's element type.
///
/// Stored on the field header so that typed accessors can validate a
/// requested Rust type against the buffer before handing out a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 32-bit signed integer (`i32`).
    Int,
    /// Single precision (`f32`).
    Float,
    /// Double precision (`f64`).
    Double,
}

impl DataType {
    /// Size of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            Self::Int => std::mem::size_of::<i32>(),
            Self::Float => std::mem::size_of::<f32>(),
            Self::Double => std::mem::size_of::<f64>(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A Rust element type that can live in a field buffer.
///
/// Sealed: implemented for `i32`, `f32` and `f64` only, one per
/// [`DataType`] variant.
pub trait FieldScalar:
    sealed::Sealed + Copy + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static
{
    /// The runtime tag matching `Self`.
    const DATA_TYPE: DataType;

    /// Widen to `f64` for tolerance comparisons and reductions.
    fn to_f64(self) -> f64;
}

impl FieldScalar for i32 {
    const DATA_TYPE: DataType = DataType::Int;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl FieldScalar for f32 {
    const DATA_TYPE: DataType = DataType::Float;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl FieldScalar for f64 {
    const DATA_TYPE: DataType = DataType::Double;

    fn to_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_rust_types() {
        assert_eq!(<i32 as FieldScalar>::DATA_TYPE, DataType::Int);
        assert_eq!(<f32 as FieldScalar>::DATA_TYPE, DataType::Float);
        assert_eq!(<Real as FieldScalar>::DATA_TYPE, DataType::Double);
    }

    #[test]
    fn sizes() {
        assert_eq!(DataType::Int.size_of(), 4);
        assert_eq!(DataType::Float.size_of(), 4);
        assert_eq!(DataType::Double.size_of(), 8);
    }
}
