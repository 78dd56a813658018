//! Offline pyramid builder.
//!
//! Loads an `x,y,value` dataset CSV and writes every zoom level of the
//! pyramid into a tile store.

use anyhow::{Context, Result};
use clap::Parser;
use indexer::{load_csv, IndexBuilder, DEFAULT_WRITE_CONCURRENCY};
use pyramid_common::{PixelMapping, PyramidConfig};
use std::path::PathBuf;
use storage::{StoreConfig, TileStore};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pyramid-builder")]
#[command(about = "Builds an adaptive image/data tile pyramid from a point dataset")]
struct Args {
    /// Dataset CSV with x, y and value columns
    dataset: PathBuf,

    /// Tile store: a directory, "memory", or "s3" (S3_* variables)
    #[arg(long, env = "TILE_STORE")]
    store: Option<String>,

    /// Pyramid configuration YAML; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    tile_size: Option<u32>,

    #[arg(long)]
    zoom_levels: Option<u32>,

    /// Tiles with more points than this are rendered to images
    #[arg(long)]
    threshold: Option<usize>,

    /// global_modulo or tile_local
    #[arg(long)]
    pixel_mapping: Option<String>,

    /// Concurrent tile writes per zoom level
    #[arg(long, default_value_t = DEFAULT_WRITE_CONCURRENCY)]
    write_concurrency: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn pyramid_config(&self) -> Result<PyramidConfig> {
        let mut config = match &self.config {
            Some(path) => PyramidConfig::from_yaml_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => PyramidConfig::from_env(),
        };

        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(zoom_levels) = self.zoom_levels {
            config.zoom_levels = zoom_levels;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(mapping) = &self.pixel_mapping {
            config.pixel_mapping = PixelMapping::from_str(mapping);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.pyramid_config()?;
    let store_config = match &args.store {
        Some(location) => StoreConfig::from_location(location),
        None => StoreConfig::from_env(),
    };
    let store = TileStore::from_config(&store_config)?;

    info!(
        dataset = %args.dataset.display(),
        store = store.location(),
        tile_size = config.tile_size,
        zoom_levels = config.zoom_levels,
        threshold = config.threshold,
        "Starting pyramid build"
    );

    let dataset = load_csv(&args.dataset).await?;
    let builder = IndexBuilder::new(store.clone(), config)?
        .with_write_concurrency(args.write_concurrency);
    let report = builder.build(&dataset).await?;

    if !report.is_complete() {
        warn!(failed = report.failed, "Some tiles could not be written");
    }

    let stats = store.stats().await?;
    info!(
        image_tiles = stats.image_tiles,
        data_tiles = stats.data_tiles,
        total_bytes = stats.total_bytes,
        "Store contents"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
