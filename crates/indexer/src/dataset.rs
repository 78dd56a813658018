//! Loading point datasets.
//!
//! Datasets use the same `x,y,value` CSV layout as data tiles; extra columns
//! are ignored.

use pyramid_common::Point;
use std::path::Path;
use tracing::info;

use crate::error::{BuildError, Result};

/// Read a dataset CSV file.
pub async fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Point>> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await.map_err(|source| BuildError::DatasetIo {
        path: path.to_path_buf(),
        source,
    })?;

    let points = parse_csv(&data).map_err(|source| BuildError::DatasetFormat {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), points = points.len(), "Loaded dataset");
    Ok(points)
}

/// Parse dataset CSV from memory.
pub fn parse_csv(data: &[u8]) -> std::result::Result<Vec<Point>, storage::CodecError> {
    storage::decode_points(data)
}
