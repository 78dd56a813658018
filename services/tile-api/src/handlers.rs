//! Request handlers.

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tile_server::TileSource;
use tracing::{error, instrument};

use crate::state::AppState;

/// GET /tile/:zoom/:x/:y
///
/// Non-integer path segments are rejected by the `Path` extractor with 400.
#[instrument(skip(state))]
pub async fn tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((zoom, x, y)): Path<(u32, i64, i64)>,
) -> Response {
    match state.server.get_tile(zoom, x, y).await {
        Ok(Some(tile)) => {
            let source = match tile.source {
                TileSource::Cached => "cached",
                TileSource::Rendered => "rendered",
            };
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/png"),
                    (header::HeaderName::from_static("x-tile-source"), source),
                ],
                tile.bytes,
            )
                .into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Tile not found").into_response(),
        Err(e) => {
            error!(zoom, x, y, error = %e, "Tile request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// GET /stats
pub async fn stats_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(state.server.stats())
}

/// GET /health
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.prometheus.render(),
    )
        .into_response()
}
