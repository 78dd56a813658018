//! Synthetic point generators.
//!
//! Every generator takes a seed so a test sees the same points on every run.

use pyramid_common::{tile_scale, Point, TileId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates `count` points uniformly distributed strictly inside `tile`.
///
/// Points keep a one-unit margin from the tile edges so they stay in the same
/// tile regardless of float rounding.
///
/// # Example
///
/// ```
/// use pyramid_common::{tile_id, TileId};
/// use test_utils::points_in_tile;
///
/// let tile = TileId::new(0, 2, 3);
/// let points = points_in_tile(&tile, 256, 50, 7);
/// assert_eq!(points.len(), 50);
/// assert!(points.iter().all(|p| tile_id(p.x, p.y, 0, 256) == tile));
/// ```
pub fn points_in_tile(tile: &TileId, tile_size: u32, count: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let scale = tile_scale(tile_size, tile.zoom);
    let (origin_x, origin_y) = tile.origin(tile_size);

    (0..count)
        .map(|_| {
            let x = origin_x + rng.gen_range(1.0..scale - 1.0);
            let y = origin_y + rng.gen_range(1.0..scale - 1.0);
            Point::new(x, y, rng.gen_range(1..100))
        })
        .collect()
}

/// Creates a Gaussian cluster of `count` points around `center`.
///
/// Values are drawn from `50..100` (high intensity).
pub fn create_cluster(center: (f64, f64), spread: f64, count: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let (dx, dy) = gaussian_pair(&mut rng);
            Point::new(
                center.0 + dx * spread,
                center.1 + dy * spread,
                rng.gen_range(50..100),
            )
        })
        .collect()
}

/// Creates `count` points uniformly spread over `[min, max)` on both axes.
///
/// Values are drawn from `1..50` (low intensity).
pub fn create_sparse_points(min: f64, max: f64, count: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point::new(
                rng.gen_range(min..max),
                rng.gen_range(min..max),
                rng.gen_range(1..50),
            )
        })
        .collect()
}

/// Clustered-plus-sparse dataset over `[0, extent)`.
///
/// `clusters` cluster centers are placed uniformly, each with
/// `cluster_size` points and a standard deviation of `extent / 20`.
pub fn create_synthetic_dataset(
    clusters: usize,
    cluster_size: usize,
    sparse: usize,
    extent: f64,
    seed: u64,
) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(clusters * cluster_size + sparse);

    for i in 0..clusters {
        let center = (rng.gen_range(0.0..extent), rng.gen_range(0.0..extent));
        points.extend(create_cluster(center, extent / 20.0, cluster_size, seed + 1 + i as u64));
    }
    points.extend(create_sparse_points(0.0, extent, sparse, seed.wrapping_mul(31)));

    points
}

/// Box-Muller transform: two independent standard normal samples.
fn gaussian_pair(rng: &mut StdRng) -> (f64, f64) {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    let radius = (-2.0 * u1.ln()).sqrt();
    let angle = 2.0 * std::f64::consts::PI * u2;
    (radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyramid_common::tile_id;

    #[test]
    fn test_points_in_tile_stay_in_tile() {
        for zoom in 0..4 {
            let tile = TileId::new(zoom, -2, 5);
            let points = points_in_tile(&tile, 256, 200, 42);
            assert!(points.iter().all(|p| tile_id(p.x, p.y, zoom, 256) == tile));
        }
    }

    #[test]
    fn test_generators_are_seeded() {
        assert_eq!(create_sparse_points(0.0, 10.0, 20, 1), create_sparse_points(0.0, 10.0, 20, 1));
        assert_ne!(create_sparse_points(0.0, 10.0, 20, 1), create_sparse_points(0.0, 10.0, 20, 2));
        assert_eq!(create_cluster((5.0, 5.0), 1.0, 20, 3), create_cluster((5.0, 5.0), 1.0, 20, 3));
    }

    #[test]
    fn test_synthetic_dataset_size() {
        let points = create_synthetic_dataset(3, 100, 50, 10_000.0, 42);
        assert_eq!(points.len(), 350);
        assert!(points[300..].iter().all(|p| (1..50).contains(&p.value)));
    }
}
