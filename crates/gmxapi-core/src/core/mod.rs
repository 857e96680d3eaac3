//! # Core Module
//!
//! The typed data model shared by the factory and by workflow code.
//!
//! - **Element types** ([`dtype`], [`scalar`]) - The closed set of element type
//!   tags, tagged scalar values, and the mapping from native Rust types.
//! - **Deferred values** ([`deferred`]) - Explicit ready/pending state for results
//!   that the workflow runtime has not produced yet.
//! - **Arrays** ([`array`]) - `Shape`, the `NdArray` capability interface and the
//!   validated `TypedArray` container.
//! - **Placeholders** ([`placeholder`]) - Input contracts that operations advertise
//!   before any concrete data exists.

pub mod array;
pub mod deferred;
pub mod dtype;
pub mod error;
pub mod placeholder;
pub mod scalar;
