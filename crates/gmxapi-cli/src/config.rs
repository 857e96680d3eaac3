use crate::error::{CliError, Result};
use gmxapi::{ArrayInput, DType, Shape};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Contents of a values file passed to `gmxapi check`.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ValuesFile {
    #[serde(default)]
    pub arrays: BTreeMap<String, ArrayEntry>,
    #[serde(default)]
    pub params: toml::Table,
}

/// One `[arrays.<name>]` table: the arguments of a single `make_array` call.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ArrayEntry {
    pub data: Option<toml::Value>,
    pub shape: Option<Vec<usize>>,
    pub dtype: Option<DType>,
    /// Label of an upstream result that has not been computed yet.
    pub pending: Option<String>,
}

impl ValuesFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: ValuesFile = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        debug!(
            arrays = file.arrays.len(),
            params = file.params.len(),
            "Loaded values file."
        );
        Ok(file)
    }
}

impl ArrayEntry {
    /// The `data` argument for the factory, if any.
    pub fn input(&self, name: &str) -> Result<Option<ArrayInput>> {
        match (&self.data, &self.pending) {
            (Some(_), Some(_)) => Err(CliError::Config(format!(
                "array '{}' sets both 'data' and 'pending'",
                name
            ))),
            (None, Some(label)) => Ok(Some(ArrayInput::pending(label.clone()))),
            (Some(value), None) => ArrayInput::try_from(value)
                .map(Some)
                .map_err(|source| CliError::Array {
                    name: name.to_string(),
                    source,
                }),
            (None, None) => Ok(None),
        }
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape.clone().map(Shape::from)
    }
}
