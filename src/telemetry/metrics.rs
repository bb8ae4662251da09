//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Ticks decoded and applied to the store
    TicksIngested,
    /// Feed messages that failed to decode
    DecodeErrors,
    /// Feed reconnection attempts
    FeedReconnects,
    /// Snapshots delivered to subscribers
    SnapshotsSent,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Connected broadcast subscribers
    ActiveSubscribers,
    /// Symbols with a history in the store
    TrackedSymbols,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::TicksIngested => "trademind_ticks_ingested_total",
            CounterMetric::DecodeErrors => "trademind_decode_errors_total",
            CounterMetric::FeedReconnects => "trademind_feed_reconnects_total",
            CounterMetric::SnapshotsSent => "trademind_snapshots_sent_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::ActiveSubscribers => "trademind_active_subscribers",
            GaugeMetric::TrackedSymbols => "trademind_tracked_symbols",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
}

/// Adjust a gauge by a signed delta
pub fn adjust_gauge(metric: GaugeMetric, delta: f64) {
    let gauge = ::metrics::gauge!(metric.name());
    if delta >= 0.0 {
        gauge.increment(delta);
    } else {
        gauge.decrement(-delta);
    }
}

/// Install the Prometheus recorder and serve `/metrics` on the given port
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;
    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}
