//! Price feed module
//!
//! Real-time crypto tickers from Binance WebSocket streams

mod binance;
pub mod ingest;
mod types;

pub use binance::{decode_ticker, BinanceTickerFeed, BINANCE_WS_URL};
pub use ingest::{run_ingestion, spawn_ingestion};
pub use types::{DecodeError, Tick};

use crate::shutdown::Shutdown;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Trait for price feed implementations
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Subscribe to normalized ticks until `shutdown` fires
    async fn subscribe(&self, shutdown: Shutdown) -> anyhow::Result<mpsc::Receiver<Tick>>;
}
