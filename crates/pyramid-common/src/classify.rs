//! Density-based choice between image and data representation.

use serde::{Deserialize, Serialize};

/// How a tile is persisted by the pyramid builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    /// Rendered raster
    Image,
    /// Raw point records
    Data,
}

/// Choose the representation for a tile holding `group_size` points.
///
/// Strictly greater than `threshold` renders an image; a group of exactly
/// `threshold` points stays a data tile.
pub fn classify(group_size: usize, threshold: usize) -> TileKind {
    if group_size > threshold {
        TileKind::Image
    } else {
        TileKind::Data
    }
}
