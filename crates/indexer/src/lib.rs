//! Offline construction of adaptive image/data tile pyramids.
//!
//! For every zoom level the dataset is partitioned by tile. Tiles with more
//! points than the configured threshold are rendered and stored as images;
//! the rest are stored as raw point records for the tile server to render
//! on demand.
//!
//! # Example
//!
//! ```ignore
//! use indexer::IndexBuilder;
//! use pyramid_common::PyramidConfig;
//! use storage::TileStore;
//!
//! let store = TileStore::local("output")?;
//! let builder = IndexBuilder::new(store, PyramidConfig::default())?;
//! let report = builder.build(&points).await?;
//! println!("{} image tiles, {} data tiles", report.image_tiles, report.data_tiles);
//! ```

pub mod builder;
pub mod dataset;
pub mod error;
pub mod report;

pub use builder::{group_by_tile, prepare_tile, IndexBuilder, DEFAULT_WRITE_CONCURRENCY};
pub use dataset::{load_csv, parse_csv};
pub use error::{BuildError, Result};
pub use report::{BuildReport, LevelReport};
