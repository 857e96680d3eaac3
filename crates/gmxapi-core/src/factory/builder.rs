use super::{make_array, ArrayInput};
use crate::core::array::{Shape, TypedArray};
use crate::core::dtype::DType;
use crate::core::error::DataModelError;
use std::sync::Arc;

/// Collects the optional arguments of [`make_array`] step by step.
#[derive(Debug, Default)]
pub struct ArrayBuilder {
    data: Option<ArrayInput>,
    shape: Option<Shape>,
    dtype: Option<DType>,
}

impl ArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: impl Into<ArrayInput>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn dtype(mut self, dtype: DType) -> Self {
        self.dtype = Some(dtype);
        self
    }

    pub fn build(self) -> Result<Arc<TypedArray>, DataModelError> {
        make_array(self.data, self.shape, self.dtype)
    }
}
