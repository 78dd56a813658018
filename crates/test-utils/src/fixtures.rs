//! Fixed point sets used across the test suite.

use pyramid_common::Point;

/// Two points in tile `0_0_0`: `(10, 10, 5)` and `(20, 20, 90)`.
pub fn two_point_tile() -> Vec<Point> {
    vec![Point::new(10.0, 10.0, 5), Point::new(20.0, 20.0, 90)]
}

/// Points straddling the zoom-0 tile boundaries around the origin.
///
/// With 256-unit tiles these land in `0_0_0`, `0_-1_0`, `0_0_-1` and `0_-1_-1`.
pub fn origin_quadrants() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0, 1),
        Point::new(-0.5, 0.0, 2),
        Point::new(0.0, -0.5, 3),
        Point::new(-0.5, -0.5, 4),
    ]
}
