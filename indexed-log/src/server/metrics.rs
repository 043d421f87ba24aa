//! Prometheus metrics for the query server.

use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

/// Container for all Prometheus metrics.
pub struct Metrics {
    registry: Registry,

    /// Counter of range queries served.
    pub query_requests_total: Counter,

    /// Counter of records returned across all queries.
    pub query_records_total: Counter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Creates a registry with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let query_requests_total = Counter::default();
        registry.register(
            "query_requests_total",
            "Total number of range queries served",
            query_requests_total.clone(),
        );

        let query_records_total = Counter::default();
        registry.register(
            "query_records_total",
            "Total number of records returned by range queries",
            query_records_total.clone(),
        );

        Self {
            registry,
            query_requests_total,
            query_records_total,
        }
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        prometheus_client::encoding::text::encode(&mut buffer, &self.registry)
            .expect("encoding metrics should not fail");
        buffer
    }
}
