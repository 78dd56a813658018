//! Request-time tile serving.
//!
//! [`TileServer`] is a read-through cache over a [`storage::TileStore`]:
//! image tiles are returned as stored, data tiles are rendered on first
//! request and the raster is written back so later requests hit the image
//! namespace.

mod error;
mod server;
mod stats;

pub use error::TileServeError;
pub use server::{ServedTile, TileServer, TileSource};
pub use stats::ServerStats;
