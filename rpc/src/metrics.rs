//! Prometheus metrics for the delegates API.
//!
//! [`ApiMetrics`] owns a dedicated [`Registry`] that the `/metrics` endpoint
//! encodes into the Prometheus text exposition format.

use eden_delegates::CacheStats;
use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::RpcError;

pub struct ApiMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// HTTP requests handled, across all routes.
    pub http_requests: IntCounter,
    /// Delegation chains resolved successfully.
    pub chain_resolutions: IntCounter,
    /// Walks rejected because the chain loops or is too deep.
    pub malformed_chains: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Query cache hits since start, refreshed on scrape.
    pub cache_hits: IntGauge,
    /// Query cache misses since start, refreshed on scrape.
    pub cache_misses: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Number of delegates returned per resolved chain.
    pub chain_length: Histogram,
}

impl ApiMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests = register_int_counter_with_registry!(
            Opts::new("eden_http_requests_total", "Total HTTP requests handled"),
            registry
        )
        .expect("failed to register http_requests counter");

        let chain_resolutions = register_int_counter_with_registry!(
            Opts::new(
                "eden_chain_resolutions_total",
                "Total delegation chains resolved"
            ),
            registry
        )
        .expect("failed to register chain_resolutions counter");

        let malformed_chains = register_int_counter_with_registry!(
            Opts::new(
                "eden_malformed_chains_total",
                "Total delegation chains rejected as cyclic or too deep"
            ),
            registry
        )
        .expect("failed to register malformed_chains counter");

        let cache_hits = register_int_gauge_with_registry!(
            Opts::new("eden_cache_hits", "Query cache hits since start"),
            registry
        )
        .expect("failed to register cache_hits gauge");

        let cache_misses = register_int_gauge_with_registry!(
            Opts::new("eden_cache_misses", "Query cache misses since start"),
            registry
        )
        .expect("failed to register cache_misses gauge");

        let chain_length = register_histogram_with_registry!(
            HistogramOpts::new("eden_chain_length", "Delegates returned per chain")
                .buckets(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 12.0]),
            registry
        )
        .expect("failed to register chain_length histogram");

        Self {
            registry,
            http_requests,
            chain_resolutions,
            malformed_chains,
            cache_hits,
            cache_misses,
            chain_length,
        }
    }

    pub fn observe_cache(&self, stats: CacheStats) {
        self.cache_hits.set(stats.hits as i64);
        self.cache_misses.set(stats.misses as i64);
    }

    /// Render every registered metric in the text exposition format.
    pub fn encode(&self) -> Result<String, RpcError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| RpcError::Server(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| RpcError::Server(e.to_string()))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_registered_metrics() {
        let metrics = ApiMetrics::new();
        metrics.chain_resolutions.inc();
        metrics.chain_length.observe(3.0);
        metrics.observe_cache(CacheStats { hits: 5, misses: 2 });

        let text = metrics.encode().unwrap();
        assert!(text.contains("eden_chain_resolutions_total 1"));
        assert!(text.contains("eden_cache_hits 5"));
        assert!(text.contains("eden_cache_misses 2"));
        assert!(text.contains("eden_chain_length_count 1"));
    }
}
