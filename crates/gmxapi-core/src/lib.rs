//! # gmxapi Data Model
//!
//! Typed N-dimensional arrays for values flowing through a deferred-execution
//! molecular-dynamics workflow.
//!
//! ## Layout
//!
//! - **[`core`]: The Data Model.** Element type tags, scalars, deferred values,
//!   the validated `TypedArray` and input placeholders.
//!
//! - **[`factory`]: Array Construction.** `make_array` and `ArrayBuilder` turn raw
//!   scalars, sequences and existing arrays into `TypedArray` values, rejecting
//!   anything that is not yet computed.
//!
//! - **[`params`]: Simulation Parameters.** The registry of typed MDP parameters
//!   and the `MdParams` store.
//!
//! ## Example
//!
//! ```
//! use gmxapi::{make_array, ArrayInput, DType, Scalar};
//!
//! let array = make_array(Some(ArrayInput::from(vec![1i64, 2, 3])), None, Some(DType::Float64))?;
//! assert_eq!(array.shape().dims(), &[3]);
//! assert_eq!(array.values(), &[Scalar::Float64(1.0), Scalar::Float64(2.0), Scalar::Float64(3.0)]);
//!
//! let deferred = make_array(Some(ArrayInput::pending("mdrun.trajectory")), None, None);
//! assert!(deferred.is_err());
//! # Ok::<(), gmxapi::DataModelError>(())
//! ```

pub mod core;
pub mod factory;
pub mod params;

pub use crate::core::array::{NdArray, Shape, TypedArray};
pub use crate::core::deferred::{FutureRef, Value};
pub use crate::core::dtype::{DType, ScalarType};
pub use crate::core::error::DataModelError;
pub use crate::core::placeholder::{ArrayPlaceholder, Dim};
pub use crate::core::scalar::Scalar;
pub use crate::factory::{make_array, validate, ArrayBuilder, ArrayInput};
