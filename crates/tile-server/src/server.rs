use bytes::Bytes;
use pyramid_common::{PyramidConfig, TileId};
use renderer::{validate_tile_image, PointRenderer, TileRenderer};
use std::sync::Arc;
use storage::TileStore;
use tracing::{debug, info, instrument, warn};

use crate::error::TileServeError;
use crate::stats::{Counters, ServerStats};

/// Where a served raster came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSource {
    /// Read from the image namespace.
    Cached,
    /// Rendered from the data namespace on this request.
    Rendered,
}

/// An encoded raster ready to return to a client.
#[derive(Debug, Clone)]
pub struct ServedTile {
    pub id: TileId,
    pub bytes: Bytes,
    pub source: TileSource,
}

/// Read-through cache in front of a [`TileStore`].
///
/// The data namespace is the source of truth and the image namespace holds
/// memoized renders. Concurrent misses on the same tile may both render;
/// rendering is deterministic and writes are atomic, so the duplicate write
/// stores identical bytes.
pub struct TileServer {
    store: TileStore,
    renderer: Arc<dyn TileRenderer>,
    config: PyramidConfig,
    counters: Counters,
}

impl TileServer {
    /// Create a server that renders misses with [`PointRenderer`].
    pub fn new(store: TileStore, config: PyramidConfig) -> Result<Self, TileServeError> {
        let renderer = Arc::new(PointRenderer::new(config.clone()));
        Self::with_renderer(store, config, renderer)
    }

    /// Create a server with a custom renderer. Cached images are checked
    /// against the renderer's raster size.
    pub fn with_renderer(
        store: TileStore,
        config: PyramidConfig,
        renderer: Arc<dyn TileRenderer>,
    ) -> Result<Self, TileServeError> {
        config.validate()?;
        Ok(Self {
            store,
            renderer,
            config,
            counters: Counters::default(),
        })
    }

    pub fn config(&self) -> &PyramidConfig {
        &self.config
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn stats(&self) -> ServerStats {
        self.counters.snapshot()
    }

    /// Fetch the raster for `(zoom, tx, ty)`.
    ///
    /// Returns `Ok(None)` when the tile is in neither namespace. Storage
    /// faults and corrupt payloads are errors.
    #[instrument(skip(self))]
    pub async fn get_tile(
        &self,
        zoom: u32,
        tx: i64,
        ty: i64,
    ) -> Result<Option<ServedTile>, TileServeError> {
        self.counters.record_request();
        let id = TileId::new(zoom, tx, ty);

        let result = self.lookup(id).await;
        match &result {
            Ok(Some(tile)) if tile.source == TileSource::Cached => self.counters.record_cache_hit(),
            Ok(Some(_)) => self.counters.record_render(),
            Ok(None) => self.counters.record_not_found(),
            Err(e) => {
                warn!(key = %id, error = %e, "Failed to serve tile");
                self.counters.record_error();
            }
        }
        result
    }

    async fn lookup(&self, id: TileId) -> Result<Option<ServedTile>, TileServeError> {
        if let Some(bytes) = self.store.get_image(&id).await? {
            validate_tile_image(&bytes, self.renderer.tile_size()).map_err(|e| {
                TileServeError::Corrupt {
                    key: id.key(),
                    message: e.to_string(),
                }
            })?;
            debug!(key = %id, size = bytes.len(), "Image tile hit");
            return Ok(Some(ServedTile {
                id,
                bytes,
                source: TileSource::Cached,
            }));
        }

        let Some(points) = self.store.get_data(&id).await? else {
            debug!(key = %id, "Tile not found");
            return Ok(None);
        };

        let renderer = self.renderer.clone();
        let count = points.len();
        let raster =
            tokio::task::spawn_blocking(move || renderer.render(&id, &points)).await??;
        let bytes = Bytes::from(raster);

        self.store.put_image(&id, bytes.clone()).await?;
        info!(key = %id, points = count, size = bytes.len(), "Rendered data tile on demand");

        Ok(Some(ServedTile {
            id,
            bytes,
            source: TileSource::Rendered,
        }))
    }
}
