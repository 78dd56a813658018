//! Namespaced tile store over an `object_store` backend.

use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory, ObjectStore};
use pyramid_common::{Point, Tile, TileId};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::codec::{decode_points, encode_points};
use crate::config::{ObjectStorageConfig, StoreBackend, StoreConfig};
use crate::namespace::Namespace;
use crate::{StorageError, StorageResult};

/// Tile store shared by the pyramid builder and the tile server.
///
/// Cloning is cheap; clones share the backend.
#[derive(Clone)]
pub struct TileStore {
    store: Arc<dyn ObjectStore>,
    location: String,
}

impl std::fmt::Debug for TileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileStore")
            .field("location", &self.location)
            .finish()
    }
}

impl TileStore {
    /// Wrap an existing backend.
    pub fn new(store: Arc<dyn ObjectStore>, location: impl Into<String>) -> Self {
        Self {
            store,
            location: location.into(),
        }
    }

    /// Store kept in process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory")
    }

    /// Store rooted at a local directory, created if missing.
    pub fn local(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| {
            StorageError::Config(format!("cannot create {}: {}", root.display(), e))
        })?;

        let store = LocalFileSystem::new_with_prefix(root).map_err(|e| {
            StorageError::Config(format!("cannot open {}: {}", root.display(), e))
        })?;

        Ok(Self::new(Arc::new(store), root.display().to_string()))
    }

    /// Store in an S3-compatible bucket.
    pub fn s3(config: &ObjectStorageConfig) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region(&config.region);

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::Config(format!("failed to create S3 client: {}", e)))?;

        Ok(Self::new(Arc::new(store), format!("s3://{}", config.bucket)))
    }

    /// Open the backend described by `config`.
    pub fn from_config(config: &StoreConfig) -> StorageResult<Self> {
        match &config.backend {
            StoreBackend::Local { root } => Self::local(root),
            StoreBackend::Memory => Ok(Self::in_memory()),
            StoreBackend::S3(s3) => Self::s3(s3),
        }
    }

    /// Human-readable backend location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Write `payload` for `id`, replacing any previous object.
    ///
    /// Writing the same payload again leaves the store unchanged.
    #[instrument(skip(self, payload), fields(namespace = %namespace, key = %id))]
    pub async fn put(&self, namespace: Namespace, id: &TileId, payload: Bytes) -> StorageResult<()> {
        let path = namespace.object_path(id);
        debug!(size = payload.len(), "Writing tile");

        self.store
            .put(&path, payload.into())
            .await
            .map_err(|e| StorageError::backend(&path, e))?;

        Ok(())
    }

    /// Read the payload for `id`; `Ok(None)` when it was never written.
    #[instrument(skip(self), fields(namespace = %namespace, key = %id))]
    pub async fn get(&self, namespace: Namespace, id: &TileId) -> StorageResult<Option<Bytes>> {
        let path = namespace.object_path(id);

        let result = match self.store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                debug!("Tile not present");
                return Ok(None);
            }
            Err(e) => return Err(StorageError::backend(&path, e)),
        };

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::backend(&path, e))?;

        debug!(size = bytes.len(), "Read tile");
        Ok(Some(bytes))
    }

    /// Write an encoded raster to the image namespace.
    pub async fn put_image(&self, id: &TileId, raster: Bytes) -> StorageResult<()> {
        self.put(Namespace::Image, id, raster).await
    }

    pub async fn get_image(&self, id: &TileId) -> StorageResult<Option<Bytes>> {
        self.get(Namespace::Image, id).await
    }

    /// Write points to the data namespace as CSV.
    pub async fn put_data(&self, id: &TileId, points: &[Point]) -> StorageResult<()> {
        self.put(Namespace::Data, id, Bytes::from(encode_points(points)))
            .await
    }

    /// Read and decode a data tile.
    pub async fn get_data(&self, id: &TileId) -> StorageResult<Option<Vec<Point>>> {
        let Some(bytes) = self.get(Namespace::Data, id).await? else {
            return Ok(None);
        };

        decode_points(&bytes)
            .map(Some)
            .map_err(|e| StorageError::CorruptPayload {
                path: Namespace::Data.object_path(id).to_string(),
                message: e.to_string(),
            })
    }

    /// Persist a tile in the namespace matching its representation.
    pub async fn put_tile(&self, tile: &Tile) -> StorageResult<()> {
        match tile {
            Tile::Image { id, raster } => self.put_image(id, Bytes::copy_from_slice(raster)).await,
            Tile::Data { id, points } => self.put_data(id, points).await,
        }
    }

    /// All tile ids stored in `namespace`, sorted.
    ///
    /// Objects whose names are not tile keys are skipped.
    pub async fn list(&self, namespace: Namespace) -> StorageResult<Vec<TileId>> {
        let prefix = object_store::path::Path::from(namespace.dir());
        let mut ids = Vec::new();

        let mut stream = self.store.list(Some(&prefix));
        while let Some(meta) = stream
            .try_next()
            .await
            .map_err(|e| StorageError::backend(&prefix, e))?
        {
            match meta.location.filename().and_then(|f| namespace.parse_file_name(f)) {
                Some(id) => ids.push(id),
                None => debug!(location = %meta.location, "Skipping non-tile object"),
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Count tiles and bytes in both namespaces.
    pub async fn stats(&self) -> StorageResult<StoreStats> {
        let mut stats = StoreStats {
            location: self.location.clone(),
            ..StoreStats::default()
        };

        for namespace in Namespace::ALL {
            let prefix = object_store::path::Path::from(namespace.dir());
            let mut stream = self.store.list(Some(&prefix));
            while let Some(meta) = stream
                .try_next()
                .await
                .map_err(|e| StorageError::backend(&prefix, e))?
            {
                if meta.location.filename().and_then(|f| namespace.parse_file_name(f)).is_none() {
                    continue;
                }
                stats.total_bytes += meta.size as u64;
                match namespace {
                    Namespace::Image => stats.image_tiles += 1,
                    Namespace::Data => stats.data_tiles += 1,
                }
            }
        }

        Ok(stats)
    }
}

/// Tile counts for a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub location: String,
    pub image_tiles: u64,
    pub data_tiles: u64,
    pub total_bytes: u64,
}
