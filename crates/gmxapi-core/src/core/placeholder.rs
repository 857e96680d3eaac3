use super::array::{NdArray, Shape};
use super::dtype::DType;
use itertools::Itertools;
use std::fmt;

/// Size constraint on one dimension of an input placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    Fixed(usize),
    Flexible,
}

impl Dim {
    pub fn admits(self, size: usize) -> bool {
        match self {
            Dim::Fixed(n) => n == size,
            Dim::Flexible => true,
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Fixed(n) => write!(f, "{}", n),
            Dim::Flexible => write!(f, "*"),
        }
    }
}

/// Declared type of an operation input before any data edge is connected.
///
/// The number of dimensions is fixed; each dimension may have a fixed or a
/// flexible size, and the element type may be left open with `dtype: None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayPlaceholder {
    pub dtype: Option<DType>,
    pub dims: Vec<Dim>,
}

impl ArrayPlaceholder {
    pub fn new(dtype: Option<DType>, dims: Vec<Dim>) -> Self {
        Self { dtype, dims }
    }

    /// A one-dimensional input of any length.
    pub fn vector(dtype: Option<DType>) -> Self {
        Self::new(dtype, vec![Dim::Flexible])
    }

    /// The fully fixed placeholder describing exactly `array`.
    pub fn exact<A: NdArray + ?Sized>(array: &A) -> Self {
        Self::new(
            array.dtype(),
            array.shape().dims().iter().map(|&n| Dim::Fixed(n)).collect(),
        )
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn admits_shape(&self, shape: &Shape) -> bool {
        shape.rank() == self.dims.len()
            && self
                .dims
                .iter()
                .zip(shape.dims())
                .all(|(dim, &size)| dim.admits(size))
    }

    /// Whether `array` may be connected to an input with this declaration.
    ///
    /// An array with no element type only matches a placeholder whose type
    /// is flexible too.
    pub fn accepts<A: NdArray + ?Sized>(&self, array: &A) -> bool {
        let dtype_ok = match self.dtype {
            None => true,
            Some(expected) => array.dtype() == Some(expected),
        };
        dtype_ok && self.admits_shape(array.shape())
    }
}

impl fmt::Display for ArrayPlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dtype = self.dtype.map_or("any", DType::name);
        write!(f, "{}[{}]", dtype, self.dims.iter().join(", "))
    }
}
