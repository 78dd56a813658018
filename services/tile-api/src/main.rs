//! Tile pyramid HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use pyramid_common::PyramidConfig;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use storage::{StoreConfig, TileStore};
use tile_api::{router, AppState};
use tile_server::TileServer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tile-api")]
#[command(about = "Serves tiles from a built pyramid, rendering data tiles on demand")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Tile store: a directory, "memory", or "s3" (S3_* variables)
    #[arg(long, env = "TILE_STORE")]
    store: Option<String>,

    /// Pyramid configuration YAML; defaults come from the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
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
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    let config = match &args.config {
        Some(path) => PyramidConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => PyramidConfig::from_env(),
    };

    let store_config = match &args.store {
        Some(location) => StoreConfig::from_location(location),
        None => StoreConfig::from_env(),
    };
    let store = TileStore::from_config(&store_config)?;

    info!(
        store = store.location(),
        tile_size = config.tile_size,
        pixel_mapping = config.pixel_mapping.as_str(),
        "Starting tile server"
    );

    let server = TileServer::new(store, config)?;
    let state = Arc::new(AppState::new(server, prometheus));
    let app = router(state);

    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
