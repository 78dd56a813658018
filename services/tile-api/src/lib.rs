//! HTTP adapter for the tile server.
//!
//! Routes:
//! - `GET /tile/:zoom/:x/:y` - PNG raster, 404 when the tile does not exist
//! - `GET /stats` - in-process server counters as JSON
//! - `GET /health`
//! - `GET /metrics` - Prometheus exposition

pub mod handlers;
pub mod state;

use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tile/:zoom/:x/:y", get(handlers::tile_handler))
        .route("/stats", get(handlers::stats_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
