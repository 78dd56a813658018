//! Shared application state.

use metrics_exporter_prometheus::PrometheusHandle;
use tile_server::TileServer;

/// State shared by all handlers.
pub struct AppState {
    pub server: TileServer,
    pub prometheus: PrometheusHandle,
}

impl AppState {
    pub fn new(server: TileServer, prometheus: PrometheusHandle) -> Self {
        Self { server, prometheus }
    }
}
