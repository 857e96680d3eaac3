//! # Array Factory
//!
//! Normalizes heterogeneous input into validated [`TypedArray`] values.
//!
//! The factory distinguishes two classes of failure:
//!
//! - **User input errors** are returned as [`DataModelError`]: missing
//!   `shape`/`dtype` when no data is given, and any deferred value in the
//!   input. The caller can fix these by supplying different arguments.
//! - **Contract violations** panic in every build: a `shape` or `dtype` that
//!   contradicts an existing array, data whose length contradicts an explicit
//!   shape, elements that do not convert losslessly to the requested `dtype`,
//!   and arrays of arrays. Valid usage never triggers them.
//!
//! [`validate`] runs the same checks without panicking, for callers that
//! build arrays from untrusted input such as configuration files.
//!
//! Only one-dimensional data is inferred. Higher-rank shapes are accepted when
//! given explicitly, as metadata over the leading dimension.

mod builder;
mod input;

pub use builder::ArrayBuilder;
pub use input::ArrayInput;

use crate::core::array::{Shape, TypedArray};
use crate::core::dtype::DType;
use crate::core::error::DataModelError;
use crate::core::deferred::Value;
use crate::core::scalar::Scalar;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

enum Concrete {
    Array(Arc<TypedArray>),
    Elements(Vec<Scalar>),
}

/// Why a request cannot be built.
enum BuildError {
    User(DataModelError),
    Contract(String),
}

impl From<DataModelError> for BuildError {
    fn from(e: DataModelError) -> Self {
        BuildError::User(e)
    }
}

type BuildResult<T> = Result<T, BuildError>;

macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err(BuildError::Contract(format!($($arg)+)));
        }
    };
}

/// Builds a [`TypedArray`] from optional `data`, `shape` and `dtype`.
///
/// - With no `data`, both `shape` and `dtype` are required and the result
///   holds `shape[0]` default values of `dtype`.
/// - With an existing array, that same array is returned (shared, not
///   copied); any `shape`/`dtype` given must match it exactly.
/// - With a scalar or sequence, the shape is `(len,)` unless given, the
///   dtype is that of the first element unless given, and every element is
///   converted to the dtype. A single scalar fills an explicit leading
///   dimension.
///
/// # Errors
///
/// Returns [`DataModelError::DeferredData`] if `data` is pending or contains
/// a pending element; this is checked before anything else. Returns
/// [`DataModelError::MissingParameter`] if `data` is absent and `shape` or
/// `dtype` is missing, and [`DataModelError::CapacityExceeded`] if the
/// leading dimension is too large to allocate.
///
/// # Panics
///
/// Panics on the contract violations listed in the [module docs](self).
/// Use [`validate`] first when the arguments come from an untrusted source.
#[instrument(level = "trace", skip_all, fields(shape = ?shape, dtype = ?dtype))]
pub fn make_array(
    data: Option<ArrayInput>,
    shape: Option<Shape>,
    dtype: Option<DType>,
) -> Result<Arc<TypedArray>, DataModelError> {
    match try_build(data, shape, dtype) {
        Ok(array) => Ok(array),
        Err(BuildError::User(e)) => Err(e),
        Err(BuildError::Contract(violation)) => panic!("{}", violation),
    }
}

/// Checks whether [`make_array`] would succeed for these arguments.
///
/// User input errors are reported as they would be by `make_array`;
/// contract violations are reported as [`DataModelError::Incompatible`]
/// instead of panicking.
pub fn validate(
    data: Option<&ArrayInput>,
    shape: Option<&Shape>,
    dtype: Option<DType>,
) -> Result<(), DataModelError> {
    match try_build(data.cloned(), shape.cloned(), dtype) {
        Ok(_) => Ok(()),
        Err(BuildError::User(e)) => Err(e),
        Err(BuildError::Contract(violation)) => Err(DataModelError::Incompatible(violation)),
    }
}

fn try_build(
    data: Option<ArrayInput>,
    shape: Option<Shape>,
    dtype: Option<DType>,
) -> BuildResult<Arc<TypedArray>> {
    let Some(data) = data else {
        return from_metadata(shape, dtype);
    };

    match into_concrete(data)? {
        Concrete::Array(existing) => passthrough(existing, shape.as_ref(), dtype),
        Concrete::Elements(elements) => from_elements(elements, shape, dtype).map(Arc::new),
    }
}

fn into_concrete(data: ArrayInput) -> Result<Concrete, DataModelError> {
    if let Some(future) = data.first_pending() {
        debug!(future = %future, "Refusing to build an array around deferred data.");
        return Err(DataModelError::DeferredData(future.clone()));
    }
    Ok(match data {
        ArrayInput::Array(array) => Concrete::Array(array),
        ArrayInput::Scalar(value) => Concrete::Elements(vec![value]),
        ArrayInput::Sequence(items) => {
            Concrete::Elements(items.into_iter().filter_map(Value::into_ready).collect())
        }
        ArrayInput::Pending(future) => return Err(DataModelError::DeferredData(future)),
    })
}

fn from_metadata(shape: Option<Shape>, dtype: Option<DType>) -> BuildResult<Arc<TypedArray>> {
    let shape = shape.ok_or(DataModelError::MissingParameter("shape"))?;
    let dtype = dtype.ok_or(DataModelError::MissingParameter("dtype"))?;
    let Some(fill) = dtype.default_value() else {
        return Err(BuildError::Contract(format!(
            "arrays of arrays are not supported: cannot fill an array with {dtype} elements"
        )));
    };

    if shape.is_empty() {
        warn!(%dtype, "No data and an empty shape were given; the array will hold no values.");
    }
    let length = shape.leading().unwrap_or(0);
    trace!(%shape, %dtype, "Building default-filled array.");

    Ok(Arc::new(TypedArray::from_parts(
        Some(dtype),
        shape,
        filled(fill, length)?,
    )))
}

/// `len` copies of `value`, failing instead of aborting when the
/// allocation cannot be made.
fn filled(value: Scalar, len: usize) -> Result<Vec<Scalar>, DataModelError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| DataModelError::CapacityExceeded { len })?;
    values.resize(len, value);
    Ok(values)
}

fn passthrough(
    existing: Arc<TypedArray>,
    shape: Option<&Shape>,
    dtype: Option<DType>,
) -> BuildResult<Arc<TypedArray>> {
    if let Some(shape) = shape {
        ensure!(
            shape == existing.shape(),
            "requested shape {} contradicts existing array shape {}",
            shape,
            existing.shape()
        );
    }
    if let Some(dtype) = dtype {
        ensure!(
            Some(dtype) == existing.dtype(),
            "requested dtype {} contradicts existing array dtype {:?}",
            dtype,
            existing.dtype()
        );
    }
    trace!("Passing existing array through unchanged.");
    Ok(existing)
}

fn from_elements(
    elements: Vec<Scalar>,
    shape: Option<Shape>,
    dtype: Option<DType>,
) -> BuildResult<TypedArray> {
    let length = elements.len();
    let dtype = dtype.or_else(|| elements.first().map(Scalar::dtype));
    if let Some(dtype) = dtype {
        ensure!(
            dtype.is_scalar(),
            "arrays of arrays are not supported: element type cannot be {dtype}"
        );
    }

    let mut values = match dtype {
        Some(dtype) => elements
            .iter()
            .enumerate()
            .map(|(index, element)| convert_element(dtype, index, element))
            .collect::<BuildResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    let shape = match shape {
        Some(shape) if !shape.is_empty() => {
            fit_to_leading_dimension(&mut values, &shape)?;
            shape
        }
        _ if length == 0 => Shape::empty(),
        _ => Shape::from([length]),
    };

    trace!(%shape, ?dtype, length, "Built array from raw data.");
    Ok(TypedArray::from_parts(dtype, shape, values))
}

fn convert_element(dtype: DType, index: usize, element: &Scalar) -> BuildResult<Scalar> {
    dtype.coerce(element).ok_or_else(|| {
        BuildError::Contract(format!(
            "element {index} ({element}) of type {} does not round-trip through {dtype}",
            element.dtype()
        ))
    })
}

/// Checks `values` against an explicit shape, replicating a single value
/// across the leading dimension.
fn fit_to_leading_dimension(values: &mut Vec<Scalar>, shape: &Shape) -> BuildResult<()> {
    let leading = shape.leading().unwrap_or(0);
    match values.len() {
        0 => ensure!(leading == 0, "empty data contradicts shape {}", shape),
        1 if leading != 1 => {
            ensure!(leading > 0, "a single value contradicts shape {}", shape);
            debug!(%shape, "Broadcasting a single value across the leading dimension.");
            let value = values[0].clone();
            *values = filled(value, leading)?;
        }
        length => ensure!(
            length == leading,
            "data of length {} contradicts shape {}",
            length,
            shape
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::array::NdArray;
    use crate::core::deferred::FutureRef;

    fn build(data: impl Into<ArrayInput>) -> Arc<TypedArray> {
        make_array(Some(data.into()), None, None).unwrap()
    }

    #[test]
    fn make_array_from_scalar_infers_shape_and_dtype() {
        let cases = [
            (Scalar::Bool(true), DType::Bool),
            (Scalar::Int32(-4), DType::Int32),
            (Scalar::Int64(7), DType::Int64),
            (Scalar::Float32(0.5), DType::Float32),
            (Scalar::Float64(2.5), DType::Float64),
            (Scalar::from("md"), DType::String),
            (Scalar::from(&b"\x00\x01"[..]), DType::Bytes),
        ];
        for (value, dtype) in cases {
            let array = build(value.clone());
            assert_eq!(array.shape(), &Shape::from([1]));
            assert_eq!(array.dtype(), Some(dtype));
            assert_eq!(array.values(), &[value]);
        }
    }

    #[test]
    fn make_array_treats_text_as_one_element() {
        let array = build(Scalar::from("integrator"));
        assert_eq!(array.len(), 1);
        assert_eq!(array[0].as_str(), Some("integrator"));
    }

    #[test]
    fn make_array_from_sequence_uses_first_element_type() {
        let array = build(vec![1i64, 2, 3]);
        assert_eq!(array.shape(), &Shape::from([3]));
        assert_eq!(array.dtype(), Some(DType::Int64));
        assert_eq!(array.to_vec::<i64>(), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn make_array_converts_following_elements_to_first_type() {
        let data = ArrayInput::from(vec![Scalar::Float64(1.5), Scalar::Int64(2)]);
        let array = make_array(Some(data), None, None).unwrap();
        assert_eq!(array.dtype(), Some(DType::Float64));
        assert_eq!(array.to_vec::<f64>(), Ok(vec![1.5, 2.0]));
    }

    #[test]
    fn make_array_without_data_fills_default_values() {
        let array = make_array(None, Some(Shape::from([3])), Some(DType::Int64)).unwrap();
        assert_eq!(array.shape(), &Shape::from([3]));
        assert_eq!(array.dtype(), Some(DType::Int64));
        assert_eq!(array.values().to_vec(), vec![Scalar::Int64(0); 3]);
    }

    #[test]
    fn make_array_without_data_keeps_higher_rank_shape_verbatim() {
        let array = make_array(None, Some(Shape::from([2, 3])), Some(DType::String)).unwrap();
        assert_eq!(array.shape(), &Shape::from([2, 3]));
        assert_eq!(array.len(), 2);
        assert_eq!(array[1], Scalar::String(String::new()));
    }

    #[test]
    fn make_array_without_data_and_empty_shape_has_no_values() {
        let array = make_array(None, Some(Shape::empty()), Some(DType::Float32)).unwrap();
        assert!(array.is_empty());
        assert_eq!(array.dtype(), Some(DType::Float32));
    }

    #[test]
    fn make_array_without_anything_is_a_user_error() {
        assert_eq!(
            make_array(None, None, None),
            Err(DataModelError::MissingParameter("shape"))
        );
        assert_eq!(
            make_array(None, Some(Shape::from([3])), None),
            Err(DataModelError::MissingParameter("dtype"))
        );
        assert_eq!(
            make_array(None, None, Some(DType::Int64)),
            Err(DataModelError::MissingParameter("shape"))
        );
    }

    #[test]
    fn make_array_rejects_deferred_data_regardless_of_metadata() {
        let future = FutureRef::new("mdrun.output");
        let requests = [
            (None, None),
            (Some(Shape::from([1])), None),
            (None, Some(DType::Float64)),
            (Some(Shape::from([1])), Some(DType::Float64)),
        ];
        for (shape, dtype) in requests {
            let result = make_array(Some(ArrayInput::from(future.clone())), shape, dtype);
            assert_eq!(result, Err(DataModelError::DeferredData(future.clone())));
        }
    }

    #[test]
    fn make_array_rejects_sequence_with_deferred_element_before_inference() {
        let data = ArrayInput::sequence(vec![
            Value::Ready(Scalar::Int64(1)),
            Value::pending("op.out"),
            Value::Ready(Scalar::from("not even an int")),
        ]);
        // A mismatched dtype would panic if inference ran first.
        let result = make_array(Some(data), Some(Shape::from([5])), Some(DType::Bool));
        assert_eq!(
            result,
            Err(DataModelError::DeferredData(FutureRef::new("op.out")))
        );
    }

    #[test]
    fn make_array_passes_existing_array_through_by_identity() {
        let original = build(vec![1.0f64, 2.0]);
        let again = make_array(Some(ArrayInput::from(original.clone())), None, None).unwrap();
        assert!(Arc::ptr_eq(&original, &again));

        let checked = make_array(
            Some(ArrayInput::from(original.clone())),
            Some(Shape::from([2])),
            Some(DType::Float64),
        )
        .unwrap();
        assert!(Arc::ptr_eq(&original, &checked));
    }

    #[test]
    fn make_array_is_idempotent() {
        let inputs = [
            ArrayInput::scalar(3i64),
            ArrayInput::from(vec!["a", "b"]),
            ArrayInput::from(Vec::<f64>::new()),
        ];
        for input in inputs {
            let once = make_array(Some(input), None, None).unwrap();
            let twice = make_array(Some(ArrayInput::from(once.clone())), None, None).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn make_array_converts_exact_integers_to_requested_float() {
        let array = make_array(
            Some(ArrayInput::from(vec![1i64, 2, 3])),
            None,
            Some(DType::Float64),
        )
        .unwrap();
        assert_eq!(array.dtype(), Some(DType::Float64));
        assert_eq!(array.to_vec::<f64>(), Ok(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn make_array_from_empty_sequence_has_empty_shape_and_no_dtype() {
        let array = build(Vec::<i64>::new());
        assert_eq!(array.shape(), &Shape::empty());
        assert_eq!(array.dtype(), None);
        assert!(array.is_empty());
    }

    #[test]
    fn make_array_keeps_explicit_dtype_for_empty_sequence() {
        let array = make_array(
            Some(ArrayInput::from(Vec::<i64>::new())),
            None,
            Some(DType::Int32),
        )
        .unwrap();
        assert_eq!(array.dtype(), Some(DType::Int32));
        assert_eq!(array.shape(), &Shape::empty());
    }

    #[test]
    fn make_array_broadcasts_single_value_over_explicit_shape() {
        let array = make_array(
            Some(ArrayInput::scalar(0.5f64)),
            Some(Shape::from([4])),
            None,
        )
        .unwrap();
        assert_eq!(array.len(), 4);
        assert_eq!(array.to_vec::<f64>(), Ok(vec![0.5; 4]));
    }

    #[test]
    fn make_array_accepts_explicit_higher_rank_metadata() {
        let array = make_array(
            Some(ArrayInput::from(vec![1i32, 2, 3])),
            Some(Shape::from([3, 2])),
            None,
        )
        .unwrap();
        assert_eq!(array.shape().rank(), 2);
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn length_and_indexing_agree_through_trait() {
        let array = build(vec![10i64, 20, 30]);
        let view: &dyn NdArray = &*array;
        assert_eq!(view.len(), array.values().len());
        for i in 0..view.len() {
            assert_eq!(view.get(i), Some(&array.values()[i]));
        }
    }

    #[test]
    fn validate_reports_contract_violations_without_panicking() {
        let data = ArrayInput::from(vec![1.5f64, 2.0]);
        assert!(matches!(
            validate(Some(&data), None, Some(DType::Int64)),
            Err(DataModelError::Incompatible(msg)) if msg.contains("does not round-trip")
        ));
        assert!(matches!(
            validate(Some(&data), Some(&Shape::from([3])), None),
            Err(DataModelError::Incompatible(msg)) if msg.contains("contradicts shape")
        ));
        assert!(matches!(
            validate(None, Some(&Shape::from([1])), Some(DType::NdArray)),
            Err(DataModelError::Incompatible(_))
        ));
    }

    #[test]
    fn validate_passes_through_user_errors_and_accepts_valid_requests() {
        assert_eq!(
            validate(None, None, None),
            Err(DataModelError::MissingParameter("shape"))
        );
        assert_eq!(
            validate(Some(&ArrayInput::pending("x")), None, None),
            Err(DataModelError::DeferredData(FutureRef::new("x")))
        );
        let data = ArrayInput::from(vec![1i64, 2]);
        assert_eq!(validate(Some(&data), None, Some(DType::Float64)), Ok(()));
    }

    #[test]
    fn oversized_leading_dimension_is_an_error_not_an_abort() {
        let shape = Shape::from([usize::MAX / 8]);
        let expected = Err(DataModelError::CapacityExceeded { len: usize::MAX / 8 });

        assert_eq!(validate(None, Some(&shape), Some(DType::Int64)), expected);
        assert_eq!(
            make_array(None, Some(shape.clone()), Some(DType::Int64)).map(|_| ()),
            expected
        );

        let single = ArrayInput::from(vec![7i64]);
        assert_eq!(validate(Some(&single), Some(&shape), None), expected);
    }

    #[test]
    fn make_array_builds_independently_across_threads() {
        let arrays: Vec<Arc<TypedArray>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=4i64)
                .map(|n| scope.spawn(move || build((0..n).collect::<Vec<i64>>())))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, array) in arrays.iter().enumerate() {
            let expected: Vec<i64> = (0..=i as i64).collect();
            assert_eq!(array.shape(), &Shape::from([i + 1]));
            assert_eq!(array.to_vec::<i64>().unwrap(), expected);
        }
    }

    #[test]
    #[should_panic(expected = "contradicts existing array shape")]
    fn make_array_panics_on_shape_conflict_with_existing_array() {
        let original = build(vec![1i64, 2]);
        let _ = make_array(Some(ArrayInput::from(original)), Some(Shape::from([3])), None);
    }

    #[test]
    #[should_panic(expected = "contradicts existing array dtype")]
    fn make_array_panics_on_dtype_conflict_with_existing_array() {
        let original = build(vec![1i64, 2]);
        let _ = make_array(Some(ArrayInput::from(original)), None, Some(DType::Float64));
    }

    #[test]
    #[should_panic(expected = "contradicts shape")]
    fn make_array_panics_when_length_contradicts_shape() {
        let _ = make_array(
            Some(ArrayInput::from(vec![1i64, 2, 3])),
            Some(Shape::from([2])),
            None,
        );
    }

    #[test]
    #[should_panic(expected = "does not round-trip")]
    fn make_array_panics_on_lossy_conversion() {
        let _ = make_array(
            Some(ArrayInput::from(vec![1.5f64, 2.0])),
            None,
            Some(DType::Int64),
        );
    }

    #[test]
    #[should_panic(expected = "does not round-trip")]
    fn make_array_panics_on_mixed_text_and_numbers() {
        let _ = make_array(Some(ArrayInput::from(vec![Scalar::Int64(1), Scalar::from("x")])), None, None);
    }

    #[test]
    #[should_panic(expected = "arrays of arrays are not supported")]
    fn make_array_panics_on_array_element_type() {
        let _ = make_array(
            Some(ArrayInput::from(vec![1i64])),
            None,
            Some(DType::NdArray),
        );
    }

    #[test]
    #[should_panic(expected = "arrays of arrays are not supported")]
    fn make_array_panics_on_default_filled_array_of_arrays() {
        let _ = make_array(None, Some(Shape::from([2])), Some(DType::NdArray));
    }
}
