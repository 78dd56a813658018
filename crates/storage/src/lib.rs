//! Persistent storage for tile pyramids.
//!
//! Tiles live in two namespaces keyed by the canonical tile key:
//! - `image`: PNG rasters (`image_tiles/{key}.png`)
//! - `data`: point records as CSV (`data_tiles/{key}.csv`)
//!
//! Backends come from `object_store` (local filesystem, in-memory, S3). Each
//! backend replaces an object in a single step, so readers see either the
//! previous complete object or the new one.

pub mod codec;
pub mod config;
pub mod namespace;
pub mod tile_store;

use thiserror::Error;

pub use codec::{decode_points, encode_points, CodecError};
pub use config::{ObjectStorageConfig, StoreBackend, StoreConfig};
pub use namespace::Namespace;
pub use tile_store::{StoreStats, TileStore};

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage failures. A key that was never written is not an error; reads
/// return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failed at {path}: {source}")]
    Backend {
        path: String,
        #[source]
        source: object_store::Error,
    },

    #[error("corrupt payload at {path}: {message}")]
    CorruptPayload { path: String, message: String },

    #[error("storage configuration error: {0}")]
    Config(String),
}

impl StorageError {
    pub(crate) fn backend(path: &object_store::path::Path, source: object_store::Error) -> Self {
        Self::Backend {
            path: path.to_string(),
            source,
        }
    }
}
