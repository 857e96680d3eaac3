//! # Simulation Parameters
//!
//! Typed access to molecular-dynamics run parameters (MDP entries).
//!
//! Every recognized parameter has a fixed element type in a static registry
//! ([`parameter_type`], [`known_parameters`]). [`MdParams`] holds a value per
//! known name, converting assignments to the registered type and refusing
//! reads as any other native type.

mod error;
mod registry;
mod store;

pub use error::ParamError;
pub use registry::{known_parameters, parameter_type};
pub use store::{MdParams, ParamValue};
