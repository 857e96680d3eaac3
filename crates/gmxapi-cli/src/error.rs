use gmxapi::DataModelError;
use gmxapi::params::ParamError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Array '{name}': {source}")]
    Array {
        name: String,
        #[source]
        source: DataModelError,
    },

    #[error(transparent)]
    Params(#[from] ParamError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to open log file '{path}': {source}", path = path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {total} entries failed validation")]
    Validation { failed: usize, total: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
