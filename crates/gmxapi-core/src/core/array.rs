use super::dtype::{DType, ScalarType};
use super::error::DataModelError;
use super::scalar::Scalar;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Ordered dimension sizes of an array. The empty shape `()` means "unset".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    /// The empty shape `()`.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Size of the first dimension, if any.
    pub fn leading(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// Product of all dimension sizes; zero for the empty shape.
    pub fn num_elements(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.iter().product()
        }
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "()"),
            [n] => write!(f, "({},)", n),
            dims => write!(f, "({})", dims.iter().join(", ")),
        }
    }
}

/// Capability interface for N-dimensional array values.
///
/// Graph code checks compatibility through this trait rather than through a
/// concrete type, so any value that can report its element type, its shape,
/// and give indexed access satisfies the contract.
pub trait NdArray {
    fn dtype(&self) -> Option<DType>;

    fn shape(&self) -> &Shape;

    fn get(&self, index: usize) -> Option<&Scalar>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the elements out as a plain ordered sequence.
    fn to_list(&self) -> Vec<Scalar> {
        (0..self.len())
            .filter_map(|i| self.get(i).cloned())
            .collect()
    }
}

/// A validated, homogeneous N-dimensional array.
///
/// Instances are produced by [`make_array`](crate::factory::make_array) or
/// [`ArrayBuilder`](crate::factory::ArrayBuilder) and are immutable once
/// built. Values are stored along the first dimension; any further
/// dimensions in `shape` are metadata only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedArray {
    dtype: Option<DType>,
    shape: Shape,
    values: Vec<Scalar>,
}

impl TypedArray {
    /// Assembles an array from already-validated parts.
    ///
    /// # Panics
    ///
    /// Panics if `values` is non-empty and its length differs from the
    /// leading dimension, or if any value disagrees with `dtype`.
    pub(crate) fn from_parts(dtype: Option<DType>, shape: Shape, values: Vec<Scalar>) -> Self {
        assert!(
            values.is_empty() || shape.leading() == Some(values.len()),
            "array of {} values cannot have shape {}",
            values.len(),
            shape
        );
        assert!(
            values.iter().all(|v| Some(v.dtype()) == dtype),
            "array values must all have dtype {:?}",
            dtype
        );
        Self {
            dtype,
            shape,
            values,
        }
    }

    pub fn dtype(&self) -> Option<DType> {
        self.dtype
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scalar> {
        self.values.get(index)
    }

    /// Like [`get`](Self::get), but reports the array length on failure.
    pub fn try_get(&self, index: usize) -> Result<&Scalar, DataModelError> {
        self.values
            .get(index)
            .ok_or(DataModelError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.values.iter()
    }

    pub fn to_list(&self) -> Vec<Scalar> {
        self.values.clone()
    }

    /// Extracts the elements as native values of type `T`.
    ///
    /// The element type must be exactly `T`; no numeric conversion happens
    /// here.
    pub fn to_vec<T: ScalarType>(&self) -> Result<Vec<T>, DataModelError> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                T::from_scalar(value).ok_or(DataModelError::TypeMismatch {
                    index,
                    expected: T::DTYPE,
                    actual: value.dtype(),
                })
            })
            .collect()
    }
}

impl NdArray for TypedArray {
    fn dtype(&self) -> Option<DType> {
        self.dtype
    }

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn get(&self, index: usize) -> Option<&Scalar> {
        self.values.get(index)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn to_list(&self) -> Vec<Scalar> {
        self.values.clone()
    }
}

impl Index<usize> for TypedArray {
    type Output = Scalar;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl<'a> IntoIterator for &'a TypedArray {
    type Item = &'a Scalar;
    type IntoIter = std::slice::Iter<'a, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for TypedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dtype = self.dtype.map_or("none", DType::name);
        write!(
            f,
            "ndarray(dtype={}, shape={}, values=[{}])",
            dtype,
            self.shape,
            self.values.iter().join(", ")
        )
    }
}
