//! Broadcast loop
//!
//! Each subscriber gets its own task that pushes a [`MarketSnapshot`] on a
//! fixed interval. Subscribers never wait on each other: a slow one just
//! skips ticks, a gone one ends only its own loop.

mod snapshot;

pub use snapshot::{MarketSnapshot, SnapshotKind};

use crate::config::BroadcastSettings;
use crate::shutdown::Shutdown;
use crate::store::PriceStore;
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// The subscriber can no longer receive messages
#[derive(Debug, Error)]
#[error("Subscriber closed")]
pub struct SinkClosed;

/// Destination for serialized snapshots
#[async_trait]
pub trait SnapshotSink: Send {
    /// Deliver one text message
    async fn send_text(&mut self, text: String) -> Result<(), SinkClosed>;

    /// Resolve once the subscriber has gone away. Must be cancel-safe.
    async fn closed(&mut self);
}

/// Channel-backed sink, used for in-process subscribers
#[async_trait]
impl SnapshotSink for mpsc::Sender<String> {
    async fn send_text(&mut self, text: String) -> Result<(), SinkClosed> {
        self.send(text).await.map_err(|_| SinkClosed)
    }

    async fn closed(&mut self) {
        mpsc::Sender::closed(self).await
    }
}

/// Broadcast loop parameters
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Period between snapshots
    pub interval: Duration,
    /// Symbol whose last update stamps each snapshot
    pub reference_symbol: String,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            reference_symbol: "BTCUSDT".to_string(),
        }
    }
}

impl From<&BroadcastSettings> for BroadcastConfig {
    fn from(settings: &BroadcastSettings) -> Self {
        Self {
            interval: Duration::from_millis(settings.interval_ms),
            reference_symbol: settings.reference_symbol.to_uppercase(),
        }
    }
}

/// Why a subscriber loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberExit {
    /// The subscriber went away
    Disconnected,
    /// Process shutdown
    Shutdown,
}

/// Push snapshots to one subscriber until it disconnects or shutdown fires
pub async fn run_subscriber<S: SnapshotSink>(
    mut sink: S,
    store: PriceStore,
    config: BroadcastConfig,
    mut shutdown: Shutdown,
) -> SubscriberExit {
    telemetry::adjust_gauge(GaugeMetric::ActiveSubscribers, 1.0);

    let mut ticker = interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let exit = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = MarketSnapshot::capture(&store, &config.reference_symbol).await;
                let text = match serde_json::to_string(&snapshot) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize snapshot");
                        continue;
                    }
                };

                tokio::select! {
                    sent = sink.send_text(text) => {
                        if sent.is_err() {
                            break SubscriberExit::Disconnected;
                        }
                        telemetry::increment(CounterMetric::SnapshotsSent);
                    }
                    _ = shutdown.recv() => break SubscriberExit::Shutdown,
                }
            }
            _ = sink.closed() => break SubscriberExit::Disconnected,
            _ = shutdown.recv() => break SubscriberExit::Shutdown,
        }
    };

    telemetry::adjust_gauge(GaugeMetric::ActiveSubscribers, -1.0);
    tracing::debug!(?exit, "Subscriber loop ended");
    exit
}
