use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Request counters kept by a [`crate::TileServer`].
#[derive(Debug, Default)]
pub(crate) struct Counters {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    renders: AtomicU64,
    not_found: AtomicU64,
    errors: AtomicU64,
}

impl Counters {
    pub(crate) fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("tile_requests_total").increment(1);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("tile_cache_hits_total").increment(1);
    }

    pub(crate) fn record_render(&self) {
        self.renders.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("tile_renders_total").increment(1);
    }

    pub(crate) fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("tile_not_found_total").increment(1);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("tile_errors_total").increment(1);
    }

    pub(crate) fn snapshot(&self) -> ServerStats {
        ServerStats {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            renders: self.renders.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the server counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServerStats {
    pub requests: u64,
    /// Requests answered from the image namespace
    pub cache_hits: u64,
    /// Data tiles rendered on demand
    pub renders: u64,
    pub not_found: u64,
    pub errors: u64,
}

impl ServerStats {
    /// Cache hit rate in percent of all requests.
    pub fn hit_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.requests as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let counters = Counters::default();
        counters.record_request();
        counters.record_request();
        counters.record_cache_hit();
        counters.record_render();

        let stats = counters.snapshot();
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.renders, 1);
        assert_eq!(stats.not_found, 0);
        assert_eq!(stats.hit_rate(), 50.0);
    }

    #[test]
    fn test_hit_rate_without_requests() {
        assert_eq!(ServerStats::default().hit_rate(), 0.0);
    }
}
