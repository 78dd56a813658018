//! Pyramid builder.

use futures::{stream, StreamExt};
use metrics::counter;
use pyramid_common::{classify, Point, PyramidConfig, Tile, TileId, TileKind};
use rayon::prelude::*;
use renderer::{PointRenderer, RenderError, TileRenderer};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use storage::TileStore;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::report::{BuildReport, LevelReport};

/// Concurrent tile writes per zoom level.
pub const DEFAULT_WRITE_CONCURRENCY: usize = 16;

/// Builds every zoom level of a pyramid into a [`TileStore`].
pub struct IndexBuilder {
    store: TileStore,
    renderer: Arc<dyn TileRenderer>,
    config: PyramidConfig,
    write_concurrency: usize,
}

impl IndexBuilder {
    /// Create a builder that renders with [`PointRenderer`].
    pub fn new(store: TileStore, config: PyramidConfig) -> Result<Self> {
        let renderer = Arc::new(PointRenderer::new(config.clone()));
        Self::with_renderer(store, config, renderer)
    }

    /// Create a builder with a custom renderer.
    pub fn with_renderer(
        store: TileStore,
        config: PyramidConfig,
        renderer: Arc<dyn TileRenderer>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            renderer,
            config,
            write_concurrency: DEFAULT_WRITE_CONCURRENCY,
        })
    }

    pub fn with_write_concurrency(mut self, concurrency: usize) -> Self {
        self.write_concurrency = concurrency.max(1);
        self
    }

    pub fn config(&self) -> &PyramidConfig {
        &self.config
    }

    /// Build zoom levels `[0, zoom_levels)`.
    ///
    /// Tiles that fail to render or persist are logged and counted; they do not
    /// stop the remaining tiles or levels.
    pub async fn build(&self, dataset: &[Point]) -> Result<BuildReport> {
        let start = Instant::now();
        let mut report = BuildReport::default();

        for zoom in 0..self.config.zoom_levels {
            let level = self.build_level(dataset, zoom).await?;
            report.push(level);
        }

        info!(
            zoom_levels = self.config.zoom_levels,
            image_tiles = report.image_tiles,
            data_tiles = report.data_tiles,
            failed = report.failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Pyramid build completed"
        );

        Ok(report)
    }

    /// Build a single zoom level.
    #[instrument(skip(self, dataset), fields(points = dataset.len()))]
    pub async fn build_level(&self, dataset: &[Point], zoom: u32) -> Result<LevelReport> {
        info!(zoom, "Processing zoom level");

        let groups = group_by_tile(dataset, zoom, self.config.tile_size);
        let mut level = LevelReport {
            zoom,
            points: dataset.len(),
            groups: groups.len(),
            ..LevelReport::default()
        };

        // Rendering is CPU-bound; keep it off the async workers.
        let renderer = self.renderer.clone();
        let threshold = self.config.threshold;
        let prepared: Vec<(TileId, std::result::Result<Tile, RenderError>)> =
            tokio::task::spawn_blocking(move || {
                groups
                    .into_par_iter()
                    .map(|(id, points)| {
                        let tile = prepare_isolated(id, points, threshold, renderer.as_ref());
                        (id, tile)
                    })
                    .collect()
            })
            .await?;

        let store = &self.store;
        let outcomes: Vec<Option<TileKind>> = stream::iter(prepared)
            .map(|(id, prepared)| async move {
                let tile = match prepared {
                    Ok(tile) => tile,
                    Err(e) => {
                        warn!(key = %id, error = %e, "Failed to render tile");
                        return None;
                    }
                };

                match store.put_tile(&tile).await {
                    Ok(()) => {
                        debug!(key = %id, kind = ?tile.kind(), "Saved tile");
                        Some(tile.kind())
                    }
                    Err(e) => {
                        warn!(key = %id, error = %e, "Failed to persist tile");
                        None
                    }
                }
            })
            .buffer_unordered(self.write_concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                Some(TileKind::Image) => level.image_tiles += 1,
                Some(TileKind::Data) => level.data_tiles += 1,
                None => level.failed += 1,
            }
        }

        counter!("pyramid_image_tiles_total").increment(level.image_tiles as u64);
        counter!("pyramid_data_tiles_total").increment(level.data_tiles as u64);
        counter!("pyramid_tile_failures_total").increment(level.failed as u64);

        info!(
            zoom,
            groups = level.groups,
            image_tiles = level.image_tiles,
            data_tiles = level.data_tiles,
            failed = level.failed,
            "Zoom level completed"
        );

        Ok(level)
    }
}

/// Partition `dataset` by the tile each point falls into at `zoom`.
///
/// Keys are recomputed from the raw coordinates at every level; levels are
/// independent partitions, not refinements of each other.
pub fn group_by_tile(dataset: &[Point], zoom: u32, tile_size: u32) -> BTreeMap<TileId, Vec<Point>> {
    let mut groups: BTreeMap<TileId, Vec<Point>> = BTreeMap::new();
    for point in dataset {
        let id = pyramid_common::tile_id(point.x, point.y, zoom, tile_size);
        groups.entry(id).or_default().push(*point);
    }
    groups
}

/// Classify a group and produce the tile to persist.
pub fn prepare_tile(
    id: TileId,
    points: Vec<Point>,
    threshold: usize,
    renderer: &dyn TileRenderer,
) -> std::result::Result<Tile, RenderError> {
    match classify(points.len(), threshold) {
        TileKind::Image => {
            let raster = renderer.render(&id, &points)?;
            Ok(Tile::Image { id, raster })
        }
        TileKind::Data => Ok(Tile::Data { id, points }),
    }
}

/// [`prepare_tile`] with a panicking renderer turned into a per-tile error.
fn prepare_isolated(
    id: TileId,
    points: Vec<Point>,
    threshold: usize,
    renderer: &dyn TileRenderer,
) -> std::result::Result<Tile, RenderError> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        prepare_tile(id, points, threshold, renderer)
    }))
    .unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(RenderError::Panicked(message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::origin_quadrants;

    #[test]
    fn test_group_by_tile_handles_negative_quadrants() {
        let groups = group_by_tile(&origin_quadrants(), 0, 256);
        let keys: Vec<String> = groups.keys().map(|id| id.key()).collect();
        assert_eq!(keys, vec!["0_-1_-1", "0_-1_0", "0_0_-1", "0_0_0"]);
        assert!(groups.values().all(|g| g.len() == 1));
    }

    #[test]
    fn test_group_by_tile_is_a_partition() {
        let dataset = test_utils::create_sparse_points(-3000.0, 3000.0, 500, 9);
        for zoom in 0..4 {
            let groups = group_by_tile(&dataset, zoom, 256);
            let total: usize = groups.values().map(Vec::len).sum();
            assert_eq!(total, dataset.len());
            for (id, points) in &groups {
                assert!(points
                    .iter()
                    .all(|p| pyramid_common::tile_id(p.x, p.y, zoom, 256) == *id));
            }
        }
    }

    struct PanickingRenderer;

    impl TileRenderer for PanickingRenderer {
        fn render(&self, _tile: &TileId, _points: &[Point]) -> std::result::Result<Vec<u8>, RenderError> {
            panic!("raster overflow");
        }

        fn tile_size(&self) -> u32 {
            256
        }
    }

    #[test]
    fn test_prepare_isolated_contains_panics() {
        let id = TileId::new(0, 0, 0);
        let points = test_utils::points_in_tile(&id, 256, 5, 2);

        let err = prepare_isolated(id, points.clone(), 1, &PanickingRenderer).unwrap_err();
        assert!(matches!(err, RenderError::Panicked(ref m) if m == "raster overflow"));

        // Data tiles never reach the renderer.
        let tile = prepare_isolated(id, points.clone(), 10, &PanickingRenderer).unwrap();
        assert_eq!(tile, Tile::Data { id, points });
    }

    #[test]
    fn test_prepare_tile_respects_threshold() {
        let renderer = PointRenderer::new(PyramidConfig::default());
        let id = TileId::new(0, 0, 0);
        let points = test_utils::points_in_tile(&id, 256, 3, 1);

        let tile = prepare_tile(id, points.clone(), 3, &renderer).unwrap();
        assert_eq!(tile, Tile::Data { id, points: points.clone() });

        let tile = prepare_tile(id, points.clone(), 2, &renderer).unwrap();
        let expected = renderer.render(&id, &points).unwrap();
        assert_eq!(tile, Tile::Image { id, raster: expected });
    }
}
