use super::error::ParamError;
use super::registry::{canonical_name, known_parameters, parameter_type};
use crate::core::array::TypedArray;
use crate::core::dtype::{DType, ScalarType};
use crate::core::scalar::Scalar;
use crate::factory::{make_array, validate, ArrayInput};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A parameter value: a single scalar, or an array for array-typed entries.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(Scalar),
    Array(Arc<TypedArray>),
}

impl ParamValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ParamValue::Scalar(s) => Some(s),
            ParamValue::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Arc<TypedArray>> {
        match self {
            ParamValue::Scalar(_) => None,
            ParamValue::Array(a) => Some(a),
        }
    }
}

impl From<Scalar> for ParamValue {
    fn from(value: Scalar) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<Arc<TypedArray>> for ParamValue {
    fn from(array: Arc<TypedArray>) -> Self {
        ParamValue::Array(array)
    }
}

impl From<TypedArray> for ParamValue {
    fn from(array: TypedArray) -> Self {
        ParamValue::Array(Arc::new(array))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(s) => write!(f, "{}", s),
            ParamValue::Array(a) => write!(f, "[{}]", a.iter().join(", ")),
        }
    }
}

/// Typed simulation parameters.
///
/// Every known parameter name is present from construction but starts
/// unset, so callers can check names and types up front and consumers can
/// tell which values were set explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct MdParams {
    values: BTreeMap<&'static str, Option<ParamValue>>,
}

impl Default for MdParams {
    fn default() -> Self {
        Self::new()
    }
}

impl MdParams {
    pub fn new() -> Self {
        let values = known_parameters()
            .into_iter()
            .map(|(name, _)| (name, None))
            .collect();
        Self { values }
    }

    /// Loads parameter values from a TOML file of `name = value` entries.
    pub fn load(path: &Path) -> Result<Self, ParamError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parses parameter values from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ParamError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ParamError> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ParamError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        Self::from_table(&table)
    }

    pub fn from_table(table: &toml::Table) -> Result<Self, ParamError> {
        let mut params = Self::new();
        params.apply_table(table)?;
        Ok(params)
    }

    /// Sets every entry of `table`, stopping at the first invalid one.
    #[instrument(level = "debug", skip_all, fields(entries = table.len()))]
    pub fn apply_table(&mut self, table: &toml::Table) -> Result<(), ParamError> {
        for (name, value) in table {
            self.apply_entry(name, value)?;
        }
        Ok(())
    }

    /// Sets one parameter from a TOML value: scalars directly, flat arrays
    /// through the array factory.
    pub fn apply_entry(&mut self, name: &str, value: &toml::Value) -> Result<(), ParamError> {
        let input = ArrayInput::try_from(value).map_err(|source| ParamError::Array {
            name: name.to_string(),
            source,
        })?;
        match input {
            ArrayInput::Scalar(scalar) => self.set(name, scalar),
            sequence => self.set_array(name, sequence),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(Some(_)))
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)?.as_ref()
    }

    /// Parameters that currently hold a value, in name order.
    pub fn iter_set(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> + '_ {
        self.values
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (*name, v)))
    }

    /// Sets a parameter, converting scalars losslessly to the registered type.
    ///
    /// A single scalar given for an array-typed parameter becomes a
    /// one-element array.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<(), ParamError> {
        let key = canonical_name(name)
            .ok_or_else(|| ParamError::UnknownParameter(name.to_string()))?;
        let value = normalize(key, parameter_type(key)?, value.into())?;
        debug!(parameter = key, %value, "Setting simulation parameter.");
        self.values.insert(key, Some(value));
        Ok(())
    }

    /// Builds an array from `data` and stores it under `name`.
    pub fn set_array(&mut self, name: &str, data: ArrayInput) -> Result<(), ParamError> {
        let array_error = |source| ParamError::Array {
            name: name.to_string(),
            source,
        };
        validate(Some(&data), None, None).map_err(array_error)?;
        let array = make_array(Some(data), None, None).map_err(array_error)?;
        self.set(name, array)
    }

    /// Clears a parameter, returning its previous value.
    pub fn unset(&mut self, name: &str) -> Result<Option<ParamValue>, ParamError> {
        let key = canonical_name(name)
            .ok_or_else(|| ParamError::UnknownParameter(name.to_string()))?;
        Ok(self.values.insert(key, None).flatten())
    }

    /// Reads a scalar parameter as the native type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Unavailable`] if `T` is not the registered type
    /// of `name`, and [`ParamError::NotSet`] if the parameter has no value.
    pub fn extract<T: ScalarType>(&self, name: &str) -> Result<T, ParamError> {
        let registered = parameter_type(name)?;
        let unavailable = || ParamError::Unavailable {
            name: name.to_string(),
            requested: T::DTYPE,
            registered,
        };
        if registered != T::DTYPE {
            return Err(unavailable());
        }
        match self.get(name) {
            None => Err(ParamError::NotSet(name.to_string())),
            Some(ParamValue::Scalar(scalar)) => T::from_scalar(scalar).ok_or_else(unavailable),
            Some(ParamValue::Array(_)) => Err(unavailable()),
        }
    }

    /// Reads an array-typed parameter.
    pub fn extract_array(&self, name: &str) -> Result<Arc<TypedArray>, ParamError> {
        let registered = parameter_type(name)?;
        let unavailable = || ParamError::Unavailable {
            name: name.to_string(),
            requested: DType::NdArray,
            registered,
        };
        if registered != DType::NdArray {
            return Err(unavailable());
        }
        match self.get(name) {
            None => Err(ParamError::NotSet(name.to_string())),
            Some(ParamValue::Array(array)) => Ok(Arc::clone(array)),
            Some(ParamValue::Scalar(_)) => Err(unavailable()),
        }
    }
}

fn normalize(name: &str, registered: DType, value: ParamValue) -> Result<ParamValue, ParamError> {
    match (registered, value) {
        (DType::NdArray, ParamValue::Array(array)) => Ok(ParamValue::Array(array)),
        (DType::NdArray, ParamValue::Scalar(scalar)) => {
            make_array(Some(ArrayInput::Scalar(scalar)), None, None)
                .map(ParamValue::Array)
                .map_err(|source| ParamError::Array {
                    name: name.to_string(),
                    source,
                })
        }
        (dtype, ParamValue::Scalar(scalar)) => dtype
            .coerce(&scalar)
            .map(ParamValue::Scalar)
            .ok_or_else(|| ParamError::InvalidValue {
                name: name.to_string(),
                expected: dtype,
                value: scalar.to_string(),
            }),
        (dtype, ParamValue::Array(array)) => Err(ParamError::InvalidValue {
            name: name.to_string(),
            expected: dtype,
            value: ParamValue::Array(array).to_string(),
        }),
    }
}
