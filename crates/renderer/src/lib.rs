//! Raster rendering for image tiles.
//!
//! - [`raster`]: draws a tile's points onto a fixed-size RGB raster
//! - [`png`]: deterministic PNG encoding of that raster
//!
//! [`TileRenderer`] is the seam the builder and tile server render through.

pub mod png;
pub mod raster;

use pyramid_common::{Point, PyramidConfig, TileId};
use thiserror::Error;
use tracing::debug;

pub use raster::{pixel_position, render_points, BACKGROUND, POINT_COLOR, POINT_RADIUS};

/// Errors from rendering or inspecting tile images.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("invalid tile image: {0}")]
    InvalidImage(String),

    #[error("renderer panicked: {0}")]
    Panicked(String),
}

/// Turns a tile's points into encoded image bytes.
pub trait TileRenderer: Send + Sync {
    /// Render `points` belonging to `tile` and encode the raster.
    fn render(&self, tile: &TileId, points: &[Point]) -> Result<Vec<u8>, RenderError>;

    /// Raster edge length in pixels.
    fn tile_size(&self) -> u32;
}

/// Renders each point as a small filled circle and encodes PNG.
#[derive(Debug, Clone)]
pub struct PointRenderer {
    config: PyramidConfig,
}

impl PointRenderer {
    pub fn new(config: PyramidConfig) -> Self {
        Self { config }
    }
}

impl TileRenderer for PointRenderer {
    fn render(&self, tile: &TileId, points: &[Point]) -> Result<Vec<u8>, RenderError> {
        debug!(tile = %tile, points = points.len(), "Rendering tile");
        let raster = render_points(points, tile, &self.config);
        let size = self.config.tile_size as usize;
        png::create_png_rgb(raster.as_raw(), size, size)
    }

    fn tile_size(&self) -> u32 {
        self.config.tile_size
    }
}

/// Check that `data` is an RGB PNG of exactly `tile_size` x `tile_size`.
pub fn validate_tile_image(data: &[u8], tile_size: u32) -> Result<(), RenderError> {
    let header = png::read_png_header(data)?;
    if header.width != tile_size || header.height != tile_size {
        return Err(RenderError::InvalidImage(format!(
            "expected {}x{}, found {}x{}",
            tile_size, tile_size, header.width, header.height
        )));
    }
    if !header.is_rgb8() {
        return Err(RenderError::InvalidImage(format!(
            "expected 8-bit RGB, found bit depth {} color type {}",
            header.bit_depth, header.color_type
        )));
    }
    Ok(())
}
