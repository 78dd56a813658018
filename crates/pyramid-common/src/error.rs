//! Error types for pyramid configuration and tile keys.

use thiserror::Error;

/// Result type alias using PyramidError.
pub type PyramidResult<T> = Result<T, PyramidError>;

#[derive(Debug, Error)]
pub enum PyramidError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid tile key: {0}")]
    InvalidTileKey(String),

    #[error("failed to load configuration: {0}")]
    Config(String),
}

impl From<std::io::Error> for PyramidError {
    fn from(err: std::io::Error) -> Self {
        PyramidError::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for PyramidError {
    fn from(err: serde_yaml::Error) -> Self {
        PyramidError::Config(format!("YAML error: {}", err))
    }
}
