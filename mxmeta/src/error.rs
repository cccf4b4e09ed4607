//! Error types for metadata I/O and inference

use std::io;
use std::path::PathBuf;

use mxmeta_core::{MatrixFormat, MetaError};

/// Result type for mxmeta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from sidecar I/O, inference and configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid metadata: {0}")]
    Metadata(#[from] MetaError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Cannot infer metadata for format {0}")]
    UnsupportedFormat(MatrixFormat),

    #[error("Sidecar {path} describes a {data_type}, not a matrix")]
    NotAMatrix { path: PathBuf, data_type: String },

    #[error("Binding {name} rejected: {source}")]
    InvalidBinding { name: String, source: MetaError },

    #[error("Invalid configuration value for {key}: {value}")]
    Config { key: &'static str, value: String },
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
