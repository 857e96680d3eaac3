use crate::core::dtype::DType;
use crate::core::error::DataModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("Named parameter '{0}' has unknown type mapping")]
    UnknownParameter(String),

    #[error("Parameter '{0}' has not been set")]
    NotSet(String),

    #[error("Parameter '{name}' is not available as {requested} (registered type is {registered})")]
    Unavailable {
        name: String,
        requested: DType,
        registered: DType,
    },

    #[error("Invalid value {value} for parameter '{name}' of type {expected}")]
    InvalidValue {
        name: String,
        expected: DType,
        value: String,
    },

    #[error("Invalid array for parameter '{name}': {source}")]
    Array {
        name: String,
        #[source]
        source: DataModelError,
    },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}
