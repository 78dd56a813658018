//! Error types for pyramid construction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a build. Failures of individual tiles are not errors;
/// they are counted in the build report.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The pyramid configuration is unusable.
    #[error(transparent)]
    InvalidConfig(#[from] pyramid_common::PyramidError),

    /// A blocking render batch panicked or was cancelled.
    #[error("render task failed: {0}")]
    Join(String),

    /// The dataset file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    DatasetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset file is not valid `x,y,value` CSV.
    #[error("invalid dataset {path}: {source}")]
    DatasetFormat {
        path: PathBuf,
        #[source]
        source: storage::CodecError,
    },
}

impl From<tokio::task::JoinError> for BuildError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}

/// Result type for builder operations.
pub type Result<T> = std::result::Result<T, BuildError>;
