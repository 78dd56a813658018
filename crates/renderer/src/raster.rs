//! Point rasterization.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use pyramid_common::{tile_scale, PixelMapping, Point, PyramidConfig, TileId};

/// Fill color for empty pixels (white).
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Color of every drawn point (blue). Point values do not change it, so the
/// raster does not depend on draw order.
pub const POINT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Radius in pixels of the disc drawn per point.
pub const POINT_RADIUS: i32 = 2;

/// Pixel position of a point inside its tile raster.
///
/// Positions are clamped to one disc past each raster edge, so far-off
/// points draw nothing and the circle arithmetic cannot overflow.
pub fn pixel_position(point: &Point, tile: &TileId, config: &PyramidConfig) -> (i32, i32) {
    let size = config.tile_size as f64;
    let (x, y) = match config.pixel_mapping {
        PixelMapping::GlobalModulo => (point.x.rem_euclid(size), point.y.rem_euclid(size)),
        PixelMapping::TileLocal => {
            let (origin_x, origin_y) = tile.origin(config.tile_size);
            let pixels_per_unit = size / tile_scale(config.tile_size, tile.zoom);
            (
                (point.x - origin_x) * pixels_per_unit,
                (point.y - origin_y) * pixels_per_unit,
            )
        }
    };
    (clamp_pixel(x, size), clamp_pixel(y, size))
}

fn clamp_pixel(coord: f64, size: f64) -> i32 {
    let margin = (POINT_RADIUS + 1) as f64;
    coord.floor().clamp(-margin, size + margin) as i32
}

/// Draw `points` onto a white `tile_size` x `tile_size` raster.
pub fn render_points(points: &[Point], tile: &TileId, config: &PyramidConfig) -> RgbImage {
    let size = config.tile_size;
    let mut raster = RgbImage::from_pixel(size, size, BACKGROUND);

    for point in points {
        let center = pixel_position(point, tile, config);
        draw_filled_circle_mut(&mut raster, center, POINT_RADIUS, POINT_COLOR);
    }

    raster
}
