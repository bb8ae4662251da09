//! Serve command implementation

use crate::api::{self, ApiState};
use crate::broadcast::BroadcastConfig;
use crate::config::Config;
use crate::feed::{spawn_ingestion, BinanceTickerFeed};
use crate::query::QueryFacade;
use crate::sentiment::CannedSentiment;
use crate::shutdown;
use crate::store::PriceStore;
use crate::telemetry::{self, GaugeMetric};
use clap::Args;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the HTTP bind address
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let feed_config = &config.feed;
        let store = PriceStore::new(
            feed_config
                .crypto_symbols
                .iter()
                .chain(feed_config.stock_symbols.iter()),
            feed_config.history_capacity,
        );
        let tracked = store.symbols().await.len();
        telemetry::set_gauge(GaugeMetric::TrackedSymbols, tracked as f64);

        if !feed_config.stock_symbols.is_empty() {
            tracing::info!(
                equities = ?feed_config.stock_symbols,
                api_key = %config.redacted_api_key(),
                "Equity symbols tracked without live ingestion"
            );
        }

        let (trigger, shutdown) = shutdown::channel();

        let feed = BinanceTickerFeed::with_base_url(
            feed_config.base_url.clone(),
            feed_config.crypto_symbols.iter().cloned(),
        )
        .with_reconnect(feed_config.reconnect_policy());
        let mut ingestion = spawn_ingestion(&feed, store.clone(), shutdown.clone()).await?;

        let bind = self
            .bind
            .clone()
            .unwrap_or_else(|| config.server.bind_address.clone());
        let listener = TcpListener::bind(&bind).await?;
        tracing::info!(address = %bind, "HTTP API listening");
        tracing::info!("Market stream: ws://{}/ws/market", bind);

        let state = ApiState {
            facade: QueryFacade::new(store, Arc::new(CannedSentiment::new())),
            broadcast: BroadcastConfig::from(&config.broadcast),
            shutdown,
        };
        let mut server = tokio::spawn(api::serve(listener, state));

        let exit = supervise(&mut server, &mut ingestion, tokio::signal::ctrl_c()).await;
        trigger.trigger();

        match exit? {
            ServeExit::Interrupted => {
                server.await??;
                let applied = ingestion.await?;
                tracing::info!(applied, "Shutdown complete");
                Ok(())
            }
            ServeExit::ServerStopped => {
                let _ = ingestion.await;
                anyhow::bail!("HTTP server stopped unexpectedly")
            }
            ServeExit::FeedStopped { applied } => {
                server.await??;
                anyhow::bail!("Price feed stopped after {} ticks", applied)
            }
        }
    }
}

/// Which event ended the serve loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServeExit {
    Interrupted,
    ServerStopped,
    FeedStopped { applied: u64 },
}

/// Wait for an interrupt or for either long-running task to end
async fn supervise(
    server: &mut JoinHandle<anyhow::Result<()>>,
    ingestion: &mut JoinHandle<u64>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> anyhow::Result<ServeExit> {
    tokio::select! {
        signal = interrupt => {
            signal?;
            tracing::info!("Shutdown requested");
            Ok(ServeExit::Interrupted)
        }
        result = server => {
            result??;
            tracing::error!("HTTP server stopped unexpectedly");
            Ok(ServeExit::ServerStopped)
        }
        applied = ingestion => {
            let applied = applied?;
            tracing::error!(applied, "Price feed stopped, shutting down");
            Ok(ServeExit::FeedStopped { applied })
        }
    }
}
