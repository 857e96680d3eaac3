use crate::core::array::TypedArray;
use crate::core::deferred::{FutureRef, Value};
use crate::core::error::DataModelError;
use crate::core::scalar::Scalar;
use std::sync::Arc;

/// The `data` argument of [`make_array`](super::make_array).
///
/// Raw input is either a single scalar, an ordered sequence whose elements
/// may still be pending, an already-built array, or a deferred value as a
/// whole.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayInput {
    Scalar(Scalar),
    Sequence(Vec<Value<Scalar>>),
    Array(Arc<TypedArray>),
    Pending(FutureRef),
}

impl ArrayInput {
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        ArrayInput::Scalar(value.into())
    }

    pub fn sequence(items: Vec<Value<Scalar>>) -> Self {
        ArrayInput::Sequence(items)
    }

    pub fn pending(label: impl Into<String>) -> Self {
        ArrayInput::Pending(FutureRef::new(label))
    }

    /// Whether this input is deferred or contains a deferred element.
    pub fn is_deferred(&self) -> bool {
        self.first_pending().is_some()
    }

    pub(crate) fn first_pending(&self) -> Option<&FutureRef> {
        match self {
            ArrayInput::Pending(future) => Some(future),
            ArrayInput::Sequence(items) => items.iter().find_map(Value::as_pending),
            ArrayInput::Scalar(_) | ArrayInput::Array(_) => None,
        }
    }
}

impl From<Scalar> for ArrayInput {
    fn from(value: Scalar) -> Self {
        ArrayInput::Scalar(value)
    }
}

impl From<Value<Scalar>> for ArrayInput {
    fn from(value: Value<Scalar>) -> Self {
        match value {
            Value::Ready(v) => ArrayInput::Scalar(v),
            Value::Pending(future) => ArrayInput::Pending(future),
        }
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for ArrayInput {
    fn from(values: Vec<T>) -> Self {
        ArrayInput::Sequence(values.into_iter().map(|v| Value::Ready(v.into())).collect())
    }
}

impl From<Arc<TypedArray>> for ArrayInput {
    fn from(array: Arc<TypedArray>) -> Self {
        ArrayInput::Array(array)
    }
}

impl From<TypedArray> for ArrayInput {
    fn from(array: TypedArray) -> Self {
        ArrayInput::Array(Arc::new(array))
    }
}

impl From<Value<Arc<TypedArray>>> for ArrayInput {
    fn from(value: Value<Arc<TypedArray>>) -> Self {
        match value {
            Value::Ready(array) => ArrayInput::Array(array),
            Value::Pending(future) => ArrayInput::Pending(future),
        }
    }
}

impl From<FutureRef> for ArrayInput {
    fn from(future: FutureRef) -> Self {
        ArrayInput::Pending(future)
    }
}

/// Reads a single TOML value as a scalar element.
fn scalar_from_toml(value: &toml::Value) -> Result<Scalar, DataModelError> {
    match value {
        toml::Value::Boolean(b) => Ok(Scalar::Bool(*b)),
        toml::Value::Integer(i) => Ok(Scalar::Int64(*i)),
        toml::Value::Float(f) => Ok(Scalar::Float64(*f)),
        toml::Value::String(s) => Ok(Scalar::String(s.clone())),
        toml::Value::Array(_) => Err(DataModelError::UnsupportedInput(
            "nested sequences are not supported; only one-dimensional data can be inferred"
                .to_string(),
        )),
        other => Err(DataModelError::UnsupportedInput(format!(
            "a TOML {} cannot be used as an array element",
            other.type_str()
        ))),
    }
}

impl TryFrom<&toml::Value> for ArrayInput {
    type Error = DataModelError;

    fn try_from(value: &toml::Value) -> Result<Self, Self::Error> {
        match value {
            toml::Value::Array(items) => items
                .iter()
                .map(|item| scalar_from_toml(item).map(Value::Ready))
                .collect::<Result<Vec<_>, _>>()
                .map(ArrayInput::Sequence),
            scalar => scalar_from_toml(scalar).map(ArrayInput::Scalar),
        }
    }
}
