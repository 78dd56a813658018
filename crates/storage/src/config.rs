//! Tile store configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default root directory of a local tile store.
pub const DEFAULT_STORE_ROOT: &str = "output";

/// Configuration for an S3/MinIO-backed store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// S3/MinIO endpoint URL
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// AWS region (use "us-east-1" for MinIO)
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://minio:9000".to_string(),
            bucket: "tile-pyramid".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            region: "us-east-1".to_string(),
            allow_http: true,
        }
    }
}

impl ObjectStorageConfig {
    /// Read `S3_*` environment variables over the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: env::var("S3_ENDPOINT").unwrap_or(defaults.endpoint),
            bucket: env::var("S3_BUCKET").unwrap_or(defaults.bucket),
            access_key_id: env::var("S3_ACCESS_KEY").unwrap_or(defaults.access_key_id),
            secret_access_key: env::var("S3_SECRET_KEY").unwrap_or(defaults.secret_access_key),
            region: env::var("S3_REGION").unwrap_or(defaults.region),
            allow_http: env::var("S3_ALLOW_HTTP")
                .map(|v| v == "true")
                .unwrap_or(defaults.allow_http),
        }
    }
}

/// Where tiles are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreBackend {
    /// Files under a local directory (`image_tiles/`, `data_tiles/`).
    Local { root: PathBuf },
    /// Process memory; contents are lost on exit.
    Memory,
    /// S3-compatible object storage.
    S3(ObjectStorageConfig),
}

/// Configuration for a [`crate::TileStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::local(DEFAULT_STORE_ROOT)
    }
}

impl StoreConfig {
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::Local { root: root.into() },
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
        }
    }

    /// Parse a store location: `memory`, `s3` (configured from `S3_*`
    /// variables), or a local directory path.
    pub fn from_location(location: &str) -> Self {
        match location {
            "memory" => Self::memory(),
            "s3" => Self {
                backend: StoreBackend::S3(ObjectStorageConfig::from_env()),
            },
            path => Self::local(path),
        }
    }

    /// Load configuration from the `TILE_STORE` environment variable.
    pub fn from_env() -> Self {
        env::var("TILE_STORE")
            .map(|location| Self::from_location(&location))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_location() {
        assert_eq!(StoreConfig::from_location("memory"), StoreConfig::memory());
        assert_eq!(
            StoreConfig::from_location("/var/tiles"),
            StoreConfig::local("/var/tiles")
        );
        assert!(matches!(
            StoreConfig::from_location("s3").backend,
            StoreBackend::S3(_)
        ));
    }

    #[test]
    fn test_default_is_local_output_dir() {
        assert_eq!(StoreConfig::default(), StoreConfig::local(DEFAULT_STORE_ROOT));
    }
}
