use super::deferred::FutureRef;
use super::dtype::DType;
use thiserror::Error;

/// Recoverable errors raised while building or reading typed data.
///
/// Only malformed requests that a caller can fix by supplying different
/// arguments end up here. Internal inconsistencies, such as a shape that
/// disagrees with the supplied data, are contract violations and panic.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataModelError {
    #[error("Missing required parameter: {0} (shape and dtype are both required when no data is provided)")]
    MissingParameter(&'static str),

    #[error(
        "Cannot build an array from deferred data {0}: make a deferred value of array type instead of an array of deferred elements, or resolve the elements first"
    )]
    DeferredData(FutureRef),

    /// Returned by [`validate`](crate::factory::validate) for requests that
    /// `make_array` would treat as a contract violation.
    #[error("Incompatible array request: {0}")]
    Incompatible(String),

    #[error("Cannot allocate {len} elements for the requested shape")]
    CapacityExceeded { len: usize },

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Element {index} has type {actual}, expected {expected}")]
    TypeMismatch {
        index: usize,
        expected: DType,
        actual: DType,
    },

    #[error("Index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
