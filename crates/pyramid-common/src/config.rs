//! Pyramid configuration.
//!
//! Passed explicitly into the builder and the tile server instead of living
//! in process-wide constants.

use crate::error::{PyramidError, PyramidResult};
use crate::point::Point;
use crate::tile::{tile_id, TileId};
use serde::{Deserialize, Serialize};

/// Largest supported pyramid depth; keeps `2^zoom` exact in an `f64`.
pub const MAX_ZOOM_LEVELS: u32 = 32;

/// Largest supported raster edge in pixels.
pub const MAX_TILE_SIZE: u32 = 4096;

/// How a point's world coordinate becomes a pixel inside its tile raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelMapping {
    /// `floor(coord mod tile_size)` on the global coordinate (floor-mod, so
    /// negatives wrap into `[0, tile_size)`). Ignores the tile origin and the
    /// zoom scale; this is how existing pyramids were rendered.
    #[default]
    GlobalModulo,
    /// Translate by the tile's world origin, then scale world units down to
    /// pixels: `floor((coord - origin) * tile_size / scale)`.
    TileLocal,
}

impl PixelMapping {
    /// Parse from string (case-insensitive), falling back to the default.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "tile_local" | "tile-local" | "local" => Self::TileLocal,
            _ => Self::GlobalModulo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalModulo => "global_modulo",
            Self::TileLocal => "tile_local",
        }
    }
}

/// Configuration for building and serving a tile pyramid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidConfig {
    /// Raster edge length in pixels; also the world-unit tile size at zoom 0.
    pub tile_size: u32,

    /// Number of zoom levels built, `[0, zoom_levels)`.
    pub zoom_levels: u32,

    /// Tiles with more points than this are rendered to images.
    pub threshold: usize,

    /// Point-to-pixel mapping used by the renderer.
    pub pixel_mapping: PixelMapping,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            tile_size: 256,
            zoom_levels: 4,
            threshold: 100,
            pixel_mapping: PixelMapping::GlobalModulo,
        }
    }
}

impl PyramidConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TILE_SIZE") {
            if let Ok(size) = val.parse() {
                config.tile_size = size;
            }
        }

        if let Ok(val) = std::env::var("ZOOM_LEVELS") {
            if let Ok(levels) = val.parse() {
                config.zoom_levels = levels;
            }
        }

        if let Ok(val) = std::env::var("TILE_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("PIXEL_MAPPING") {
            config.pixel_mapping = PixelMapping::from_str(&val);
        }

        config
    }

    /// Parse a YAML document; missing fields keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> PyramidResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> PyramidResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> PyramidResult<()> {
        if self.tile_size == 0 {
            return Err(PyramidError::InvalidConfig("tile_size must be > 0".to_string()));
        }

        if self.tile_size > MAX_TILE_SIZE {
            return Err(PyramidError::InvalidConfig(format!(
                "tile_size must be <= {}",
                MAX_TILE_SIZE
            )));
        }

        if self.zoom_levels == 0 {
            return Err(PyramidError::InvalidConfig("zoom_levels must be >= 1".to_string()));
        }

        if self.zoom_levels > MAX_ZOOM_LEVELS {
            return Err(PyramidError::InvalidConfig(format!(
                "zoom_levels must be <= {}",
                MAX_ZOOM_LEVELS
            )));
        }

        Ok(())
    }

    /// Tile containing `point` at `zoom`.
    pub fn tile_for(&self, point: &Point, zoom: u32) -> TileId {
        tile_id(point.x, point.y, zoom, self.tile_size)
    }

    /// Whether `zoom` is one of the levels this pyramid builds.
    pub fn contains_zoom(&self, zoom: u32) -> bool {
        zoom < self.zoom_levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_pyramid() {
        let config = PyramidConfig::default();
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.zoom_levels, 4);
        assert_eq!(config.threshold, 100);
        assert_eq!(config.pixel_mapping, PixelMapping::GlobalModulo);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let mut config = PyramidConfig::default();
        config.tile_size = 0;
        assert!(config.validate().is_err());

        let mut config = PyramidConfig::default();
        config.tile_size = MAX_TILE_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = PyramidConfig::default();
        config.tile_size = 1 << 20;
        assert!(config.validate().is_err());

        let mut config = PyramidConfig::default();
        config.tile_size = MAX_TILE_SIZE;
        assert!(config.validate().is_ok());

        let mut config = PyramidConfig::default();
        config.zoom_levels = 0;
        assert!(config.validate().is_err());

        let mut config = PyramidConfig::default();
        config.zoom_levels = MAX_ZOOM_LEVELS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_partial_document() {
        let config = PyramidConfig::from_yaml_str("threshold: 10\npixel_mapping: tile_local\n").unwrap();
        assert_eq!(config.threshold, 10);
        assert_eq!(config.pixel_mapping, PixelMapping::TileLocal);
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.zoom_levels, 4);
    }

    #[test]
    fn test_yaml_invalid_values() {
        assert!(PyramidConfig::from_yaml_str("zoom_levels: 0\n").is_err());
        assert!(PyramidConfig::from_yaml_str("tile_size: [1, 2]\n").is_err());
    }

    #[test]
    fn test_pixel_mapping_from_str() {
        assert_eq!(PixelMapping::from_str("TILE_LOCAL"), PixelMapping::TileLocal);
        assert_eq!(PixelMapping::from_str("global_modulo"), PixelMapping::GlobalModulo);
        assert_eq!(PixelMapping::from_str("unknown"), PixelMapping::GlobalModulo);
        assert_eq!(PixelMapping::TileLocal.as_str(), "tile_local");
    }

    #[test]
    fn test_tile_for_uses_configured_size() {
        let config = PyramidConfig {
            tile_size: 100,
            ..PyramidConfig::default()
        };
        let point = Point::new(250.0, 99.0, 1);
        assert_eq!(config.tile_for(&point, 0), TileId::new(0, 2, 0));
        assert_eq!(config.tile_for(&point, 1), TileId::new(1, 1, 0));
        assert!(config.contains_zoom(3));
        assert!(!config.contains_zoom(4));
    }
}
