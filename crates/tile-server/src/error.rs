use renderer::RenderError;
use storage::StorageError;
use thiserror::Error;

/// Failures while serving a tile. A tile that does not exist is not an error.
#[derive(Debug, Error)]
pub enum TileServeError {
    #[error(transparent)]
    InvalidConfig(#[from] pyramid_common::PyramidError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A stored image tile is not a valid raster for this pyramid.
    #[error("corrupt image tile {key}: {message}")]
    Corrupt { key: String, message: String },

    #[error("render task failed: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for TileServeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}
