//! Tile identity: which tile a point falls into at a given zoom level.
//!
//! The world-unit footprint of a tile at `zoom` is `tile_size * 2^zoom` on
//! each axis. Tile indices use floor division, so negative coordinates land
//! in negative tiles (`-0.5` is in tile `-1`, not tile `0`).

use crate::classify::TileKind;
use crate::error::{PyramidError, PyramidResult};
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tile coordinate (zoom/tx/ty).
///
/// Canonically serialized as `"{zoom}_{tx}_{ty}"`, which is also the storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    /// Zoom level
    pub zoom: u32,
    /// Column
    pub tx: i64,
    /// Row
    pub ty: i64,
}

impl TileId {
    pub fn new(zoom: u32, tx: i64, ty: i64) -> Self {
        Self { zoom, tx, ty }
    }

    /// Canonical storage key.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.zoom, self.tx, self.ty)
    }

    /// World-space coordinates of the tile's minimum corner.
    pub fn origin(&self, tile_size: u32) -> (f64, f64) {
        let scale = tile_scale(tile_size, self.zoom);
        (self.tx as f64 * scale, self.ty as f64 * scale)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.zoom, self.tx, self.ty)
    }
}

impl FromStr for TileId {
    type Err = PyramidError;

    fn from_str(s: &str) -> PyramidResult<Self> {
        let invalid = || PyramidError::InvalidTileKey(s.to_string());

        // Keys look like "2_-3_10"; split on '_' is unambiguous since '-' only
        // appears as a sign.
        let mut parts = s.split('_');
        let (Some(zoom), Some(tx), Some(ty), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            zoom: zoom.parse().map_err(|_| invalid())?,
            tx: tx.parse().map_err(|_| invalid())?,
            ty: ty.parse().map_err(|_| invalid())?,
        })
    }
}

/// A tile in one of its two stored representations.
#[derive(Debug, Clone, PartialEq)]
pub enum Tile {
    /// Finalized raster, encoded as PNG.
    Image { id: TileId, raster: Vec<u8> },
    /// Raw, re-renderable points.
    Data { id: TileId, points: Vec<Point> },
}

impl Tile {
    pub fn id(&self) -> &TileId {
        match self {
            Tile::Image { id, .. } | Tile::Data { id, .. } => id,
        }
    }

    pub fn kind(&self) -> TileKind {
        match self {
            Tile::Image { .. } => TileKind::Image,
            Tile::Data { .. } => TileKind::Data,
        }
    }
}

/// World-unit edge length of one tile at `zoom`.
pub fn tile_scale(tile_size: u32, zoom: u32) -> f64 {
    let exp = zoom.min(i32::MAX as u32) as i32;
    tile_size as f64 * 2f64.powi(exp)
}

/// Map a world coordinate to the tile containing it.
///
/// Total over all inputs: non-finite results saturate through the `as i64` cast.
pub fn tile_id(x: f64, y: f64, zoom: u32, tile_size: u32) -> TileId {
    let scale = tile_scale(tile_size, zoom);
    TileId {
        zoom,
        tx: (x / scale).floor() as i64,
        ty: (y / scale).floor() as i64,
    }
}
