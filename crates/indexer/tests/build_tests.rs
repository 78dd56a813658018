//! End-to-end pyramid builds against in-memory and local stores.

use indexer::{group_by_tile, BuildError, IndexBuilder};
use pyramid_common::{PixelMapping, Point, PyramidConfig, TileId};
use renderer::{PointRenderer, RenderError, TileRenderer};
use std::sync::Arc;
use storage::{Namespace, TileStore};
use test_utils::{create_synthetic_dataset, points_in_tile, temp_store_dir};

fn single_level(threshold: usize) -> PyramidConfig {
    PyramidConfig {
        zoom_levels: 1,
        threshold,
        ..PyramidConfig::default()
    }
}

/// Fails for one tile and delegates to [`PointRenderer`] otherwise.
struct FailingRenderer {
    fail_on: TileId,
    inner: PointRenderer,
}

impl TileRenderer for FailingRenderer {
    fn render(&self, tile: &TileId, points: &[Point]) -> Result<Vec<u8>, RenderError> {
        if *tile == self.fail_on {
            return Err(RenderError::Encode("simulated failure".to_string()));
        }
        self.inner.render(tile, points)
    }

    fn tile_size(&self) -> u32 {
        self.inner.tile_size()
    }
}

#[tokio::test]
async fn test_dense_tile_becomes_image() {
    let store = TileStore::in_memory();
    let id = TileId::new(0, 0, 0);
    let points = points_in_tile(&id, 256, 150, 1);

    let builder = IndexBuilder::new(store.clone(), single_level(100)).unwrap();
    let report = builder.build(&points).await.unwrap();

    assert_eq!(report.image_tiles, 1);
    assert_eq!(report.data_tiles, 0);
    assert!(report.is_complete());

    let image = store.get_image(&id).await.unwrap().unwrap();
    let expected = PointRenderer::new(single_level(100)).render(&id, &points).unwrap();
    assert_eq!(image.as_ref(), expected.as_slice());
    assert!(store.get_data(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sparse_tile_keeps_points() {
    let store = TileStore::in_memory();
    let id = TileId::new(0, 0, 0);
    let points = points_in_tile(&id, 256, 50, 2);

    let builder = IndexBuilder::new(store.clone(), single_level(100)).unwrap();
    let report = builder.build(&points).await.unwrap();

    assert_eq!(report.image_tiles, 0);
    assert_eq!(report.data_tiles, 1);

    let stored = store.get_data(&id).await.unwrap().unwrap();
    assert_eq!(stored.len(), 50);
    assert_eq!(stored, points);
    assert!(store.get_image(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_threshold_is_exclusive() {
    let id = TileId::new(0, 0, 0);

    let at = TileStore::in_memory();
    IndexBuilder::new(at.clone(), single_level(100))
        .unwrap()
        .build(&points_in_tile(&id, 256, 100, 3))
        .await
        .unwrap();
    assert!(at.get_data(&id).await.unwrap().is_some());
    assert!(at.get_image(&id).await.unwrap().is_none());

    let above = TileStore::in_memory();
    IndexBuilder::new(above.clone(), single_level(100))
        .unwrap()
        .build(&points_in_tile(&id, 256, 101, 3))
        .await
        .unwrap();
    assert!(above.get_image(&id).await.unwrap().is_some());
    assert!(above.get_data(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_every_level_partitions_the_dataset() {
    let dataset = create_synthetic_dataset(3, 400, 300, 2000.0, 7);
    let config = PyramidConfig {
        zoom_levels: 3,
        threshold: 50,
        ..PyramidConfig::default()
    };
    let store = TileStore::in_memory();

    let report = IndexBuilder::new(store.clone(), config.clone())
        .unwrap()
        .with_write_concurrency(4)
        .build(&dataset)
        .await
        .unwrap();

    assert_eq!(report.levels.len(), 3);
    assert!(report.is_complete());

    let images = store.list(Namespace::Image).await.unwrap();
    let data = store.list(Namespace::Data).await.unwrap();

    for zoom in 0..3 {
        let groups = group_by_tile(&dataset, zoom, config.tile_size);
        let level = report.level(zoom).unwrap();
        assert_eq!(level.points, dataset.len());
        assert_eq!(level.groups, groups.len());
        assert_eq!(level.image_tiles + level.data_tiles, groups.len());

        for (id, points) in &groups {
            let is_image = images.contains(id);
            let is_data = data.contains(id);
            assert!(is_image != is_data, "tile {} must be in exactly one namespace", id);
            assert_eq!(is_image, points.len() > config.threshold);
        }
    }

    assert_eq!(images.len(), report.image_tiles);
    assert_eq!(data.len(), report.data_tiles);
}

#[tokio::test]
async fn test_render_failure_is_isolated() {
    let failing = TileId::new(0, 0, 0);
    let healthy = TileId::new(0, 1, 0);
    let mut dataset = points_in_tile(&failing, 256, 20, 4);
    dataset.extend(points_in_tile(&healthy, 256, 20, 5));

    let config = single_level(10);
    let renderer = Arc::new(FailingRenderer {
        fail_on: failing,
        inner: PointRenderer::new(config.clone()),
    });
    let store = TileStore::in_memory();

    let report = IndexBuilder::with_renderer(store.clone(), config, renderer)
        .unwrap()
        .build(&dataset)
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.image_tiles, 1);
    assert!(!report.is_complete());
    assert!(store.get_image(&failing).await.unwrap().is_none());
    assert!(store.get_image(&healthy).await.unwrap().is_some());
}

/// Panics for one tile and delegates to [`PointRenderer`] otherwise.
struct PanickingRenderer {
    panic_on: TileId,
    inner: PointRenderer,
}

impl TileRenderer for PanickingRenderer {
    fn render(&self, tile: &TileId, points: &[Point]) -> Result<Vec<u8>, RenderError> {
        if *tile == self.panic_on {
            panic!("render blew up for {}", tile);
        }
        self.inner.render(tile, points)
    }

    fn tile_size(&self) -> u32 {
        self.inner.tile_size()
    }
}

#[tokio::test]
async fn test_render_panic_is_isolated() {
    let broken = TileId::new(0, 0, 0);
    let healthy = TileId::new(0, 2, 2);
    let mut dataset = points_in_tile(&broken, 256, 20, 12);
    dataset.extend(points_in_tile(&healthy, 256, 20, 13));

    let config = PyramidConfig {
        zoom_levels: 2,
        threshold: 10,
        ..PyramidConfig::default()
    };
    let renderer = Arc::new(PanickingRenderer {
        panic_on: broken,
        inner: PointRenderer::new(config.clone()),
    });
    let store = TileStore::in_memory();

    let report = IndexBuilder::with_renderer(store.clone(), config, renderer)
        .unwrap()
        .build(&dataset)
        .await
        .unwrap();

    // Zoom 0 loses only the broken tile; zoom 1 still runs.
    assert_eq!(report.levels.len(), 2);
    assert_eq!(report.level(0).unwrap().failed, 1);
    assert_eq!(report.level(0).unwrap().image_tiles, 1);
    assert!(store.get_image(&broken).await.unwrap().is_none());
    assert!(store.get_image(&healthy).await.unwrap().is_some());
    assert!(store.get_image(&TileId::new(1, 1, 1)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_huge_coordinates_in_tile_local_mode() {
    let healthy = TileId::new(0, 0, 0);
    let mut dataset = points_in_tile(&healthy, 256, 5, 14);
    dataset.push(Point::new(1e300, 10.0, 1));
    dataset.push(Point::new(1e300, 20.0, 2));

    let config = PyramidConfig {
        zoom_levels: 1,
        threshold: 1,
        pixel_mapping: PixelMapping::TileLocal,
        ..PyramidConfig::default()
    };
    let store = TileStore::in_memory();

    let report = IndexBuilder::new(store.clone(), config)
        .unwrap()
        .build(&dataset)
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.image_tiles, 2);
    assert!(store.get_image(&healthy).await.unwrap().is_some());
}

#[tokio::test]
async fn test_empty_dataset_writes_nothing() {
    let store = TileStore::in_memory();
    let report = IndexBuilder::new(store.clone(), PyramidConfig::default())
        .unwrap()
        .build(&[])
        .await
        .unwrap();

    assert_eq!(report.levels.len(), 4);
    assert!(report.levels.iter().all(|l| l.groups == 0));
    assert!(store.list(Namespace::Image).await.unwrap().is_empty());
    assert!(store.list(Namespace::Data).await.unwrap().is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = PyramidConfig {
        tile_size: 0,
        ..PyramidConfig::default()
    };
    let result = IndexBuilder::new(TileStore::in_memory(), config);
    assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_rebuild_is_idempotent() {
    let dir = temp_store_dir();
    let dataset = create_synthetic_dataset(2, 200, 100, 1000.0, 11);
    let config = PyramidConfig {
        zoom_levels: 2,
        threshold: 40,
        ..PyramidConfig::default()
    };

    let store = TileStore::local(dir.path()).unwrap();
    let builder = IndexBuilder::new(store.clone(), config).unwrap();

    builder.build(&dataset).await.unwrap();
    let first = store.stats().await.unwrap();
    builder.build(&dataset).await.unwrap();
    let second = store.stats().await.unwrap();

    assert_eq!(first, second);
    assert!(dir.path().join("image_tiles").is_dir() || dir.path().join("data_tiles").is_dir());
}
