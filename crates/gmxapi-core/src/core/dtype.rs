use super::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Element type tag for gmxapi data.
///
/// Every tag except [`DType::NdArray`] names a scalar type that can be stored
/// in a [`TypedArray`](super::array::TypedArray). `NdArray` labels the array
/// type itself; it is meaningful for parameter typing but never as an element
/// type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// Boolean logical type.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit IEEE float.
    Float32,
    /// 64-bit IEEE float.
    Float64,
    /// UTF-8 text, always a single element.
    String,
    /// Raw byte string, always a single element.
    Bytes,
    /// Multi-dimensional array with metadata.
    NdArray,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown data type name: '{0}'")]
pub struct ParseDTypeError(pub String);

impl DType {
    pub const ALL: [DType; 8] = [
        DType::Bool,
        DType::Int32,
        DType::Int64,
        DType::Float32,
        DType::Float64,
        DType::String,
        DType::Bytes,
        DType::NdArray,
    ];

    /// Canonical lowercase name, as accepted by [`FromStr`] and serde.
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::String => "string",
            DType::Bytes => "bytes",
            DType::NdArray => "ndarray",
        }
    }

    pub fn is_scalar(self) -> bool {
        !matches!(self, DType::NdArray)
    }

    /// The default-constructed value of this type, or `None` for `NdArray`.
    pub fn default_value(self) -> Option<Scalar> {
        match self {
            DType::Bool => Some(Scalar::Bool(false)),
            DType::Int32 => Some(Scalar::Int32(0)),
            DType::Int64 => Some(Scalar::Int64(0)),
            DType::Float32 => Some(Scalar::Float32(0.0)),
            DType::Float64 => Some(Scalar::Float64(0.0)),
            DType::String => Some(Scalar::String(String::new())),
            DType::Bytes => Some(Scalar::Bytes(Vec::new())),
            DType::NdArray => None,
        }
    }

    /// Converts `value` to this type if the conversion is lossless.
    ///
    /// Returns `None` unless converting back yields a value equal to the
    /// input. NaN is treated as equal to itself. Text and bytes convert only
    /// to their own type; numeric types (including `Bool` as 0/1) convert
    /// among each other when exact.
    pub fn coerce(self, value: &Scalar) -> Option<Scalar> {
        if value.dtype() == self {
            return Some(value.clone());
        }
        match (self, value) {
            (DType::String, _) | (DType::Bytes, _) | (DType::NdArray, _) => None,
            (_, Scalar::String(_)) | (_, Scalar::Bytes(_)) => None,
            (target, source) => coerce_numeric(target, exact_numeric(source)?),
        }
    }
}

/// Exact view of a numeric scalar, wide enough to hold every supported type.
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

fn exact_numeric(value: &Scalar) -> Option<Numeric> {
    match *value {
        Scalar::Bool(b) => Some(Numeric::Int(b as i128)),
        Scalar::Int32(i) => Some(Numeric::Int(i as i128)),
        Scalar::Int64(i) => Some(Numeric::Int(i as i128)),
        Scalar::Float32(f) => Some(Numeric::Float(f as f64)),
        Scalar::Float64(f) => Some(Numeric::Float(f)),
        Scalar::String(_) | Scalar::Bytes(_) => None,
    }
}

fn integral(n: Numeric) -> Option<i128> {
    match n {
        Numeric::Int(i) => Some(i),
        Numeric::Float(f) if f.is_finite() && f.fract() == 0.0 => {
            let i = f as i128;
            (i as f64 == f).then_some(i)
        }
        Numeric::Float(_) => None,
    }
}

fn coerce_numeric(target: DType, n: Numeric) -> Option<Scalar> {
    match target {
        DType::Bool => match integral(n)? {
            0 => Some(Scalar::Bool(false)),
            1 => Some(Scalar::Bool(true)),
            _ => None,
        },
        DType::Int32 => i32::try_from(integral(n)?).ok().map(Scalar::Int32),
        DType::Int64 => i64::try_from(integral(n)?).ok().map(Scalar::Int64),
        DType::Float32 => match n {
            Numeric::Int(i) => {
                let f = i as f32;
                (f as i128 == i).then_some(Scalar::Float32(f))
            }
            Numeric::Float(f) => {
                let g = f as f32;
                (g as f64 == f || f.is_nan()).then_some(Scalar::Float32(g))
            }
        },
        DType::Float64 => match n {
            Numeric::Int(i) => {
                let f = i as f64;
                (f as i128 == i).then_some(Scalar::Float64(f))
            }
            Numeric::Float(f) => Some(Scalar::Float64(f)),
        },
        DType::String | DType::Bytes | DType::NdArray => None,
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DType {
    type Err = ParseDTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(DType::Bool),
            "int32" | "i32" => Ok(DType::Int32),
            "int64" | "i64" | "int" => Ok(DType::Int64),
            "float32" | "f32" => Ok(DType::Float32),
            "float64" | "f64" | "float" => Ok(DType::Float64),
            "string" | "str" => Ok(DType::String),
            "bytes" => Ok(DType::Bytes),
            "ndarray" | "mdarray" => Ok(DType::NdArray),
            _ => Err(ParseDTypeError(s.to_string())),
        }
    }
}

/// Native Rust types with a fixed gmxapi element type.
pub trait ScalarType: Sized {
    const DTYPE: DType;

    fn into_scalar(self) -> Scalar;

    /// Reads a scalar of exactly this type. No conversion is attempted.
    fn from_scalar(value: &Scalar) -> Option<Self>;
}

macro_rules! impl_scalar_type {
    ($ty:ty, $variant:ident) => {
        impl ScalarType for $ty {
            const DTYPE: DType = DType::$variant;

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn from_scalar(value: &Scalar) -> Option<Self> {
                match value {
                    Scalar::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_scalar_type!(bool, Bool);
impl_scalar_type!(i32, Int32);
impl_scalar_type!(i64, Int64);
impl_scalar_type!(f32, Float32);
impl_scalar_type!(f64, Float64);
impl_scalar_type!(String, String);
