//! Common types shared by the tile pyramid crates.
//!
//! A pyramid partitions a flat 2-D point dataset into square tiles at several
//! zoom levels. Each tile is stored either as a rendered raster (image tile)
//! or as its raw points (data tile), depending on how many points it holds.

pub mod classify;
pub mod config;
pub mod error;
pub mod point;
pub mod tile;

pub use classify::{classify, TileKind};
pub use config::{PixelMapping, PyramidConfig, MAX_TILE_SIZE};
pub use error::{PyramidError, PyramidResult};
pub use point::Point;
pub use tile::{tile_id, tile_scale, Tile, TileId};
