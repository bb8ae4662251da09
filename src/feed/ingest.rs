//! Feed ingestion loop
//!
//! Drains normalized ticks into the price store.

use super::{PriceFeed, Tick};
use crate::shutdown::Shutdown;
use crate::store::PriceStore;
use crate::telemetry::{self, CounterMetric};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Apply every tick from `ticks` to `store` until the channel closes.
///
/// Returns the number of ticks applied.
pub async fn run_ingestion(mut ticks: mpsc::Receiver<Tick>, store: PriceStore) -> u64 {
    let mut applied = 0u64;

    while let Some(tick) = ticks.recv().await {
        store.apply(&tick).await;
        applied += 1;
        telemetry::increment(CounterMetric::TicksIngested);
        tracing::trace!(symbol = %tick.symbol, price = tick.price, "Tick applied");
    }

    tracing::info!(applied, "Feed ingestion stopped");
    applied
}

/// Subscribe to `feed` and spawn the ingestion task
pub async fn spawn_ingestion(
    feed: &dyn PriceFeed,
    store: PriceStore,
    shutdown: Shutdown,
) -> anyhow::Result<JoinHandle<u64>> {
    let ticks = feed.subscribe(shutdown).await?;
    Ok(tokio::spawn(run_ingestion(ticks, store)))
}
