//! Binance WebSocket ticker feed implementation

use super::{DecodeError, PriceFeed, Tick};
use crate::shutdown::Shutdown;
use crate::store::AssetClass;
use crate::telemetry::{self, CounterMetric};
use crate::ws::{ReconnectPolicy, WsClient, WsConfig, WsMessage};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::mpsc;

/// Binance WebSocket base URL
pub const BINANCE_WS_URL: &str = "wss://stream.binance.com:9443/ws";

/// Stream suffix for the rolling 24h ticker
const TICKER_STREAM_SUFFIX: &str = "@ticker";

/// Event type carried by ticker messages
const TICKER_EVENT: &str = "24hrTicker";

/// Binance 24h ticker message, only the fields we consume
#[derive(Debug, Deserialize)]
struct BinanceTickerMessage {
    /// Event type
    #[serde(rename = "e", default)]
    event_type: Option<String>,
    /// Symbol
    #[serde(rename = "s")]
    symbol: String,
    /// Last price
    #[serde(rename = "c")]
    last_price: String,
    /// Price change percent
    #[serde(rename = "P")]
    price_change_percent: String,
}

/// Decode one raw ticker message into a [`Tick`]
pub fn decode_ticker(msg: &str) -> Result<Tick, DecodeError> {
    let ticker: BinanceTickerMessage = serde_json::from_str(msg)?;

    if let Some(event) = ticker.event_type {
        if event != TICKER_EVENT {
            return Err(DecodeError::UnexpectedEvent(event));
        }
    }

    let symbol = ticker.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(DecodeError::EmptySymbol);
    }

    let price = parse_decimal("c", &ticker.last_price)?;
    let change_percent = parse_decimal("P", &ticker.price_change_percent)?;

    Ok(Tick {
        symbol,
        price,
        change_percent,
        asset_class: AssetClass::Crypto,
        timestamp: Utc::now(),
    })
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f64, DecodeError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| DecodeError::InvalidNumber {
            field,
            value: value.to_string(),
        })?;
    if !parsed.is_finite() {
        return Err(DecodeError::NonFinite { field });
    }
    Ok(parsed)
}

/// Binance combined-path feed over `<symbol>@ticker` streams
pub struct BinanceTickerFeed {
    base_url: String,
    symbols: Vec<String>,
    reconnect: ReconnectPolicy,
}

impl BinanceTickerFeed {
    /// Create a new feed for the given symbols against the public endpoint
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_base_url(BINANCE_WS_URL, symbols)
    }

    /// Create a feed against a custom base URL
    pub fn with_base_url<I, S>(base_url: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_url: base_url.into(),
            symbols: symbols
                .into_iter()
                .map(|s| s.into().trim().to_lowercase())
                .collect(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Override reconnection behaviour
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Build the WebSocket URL, e.g. `.../ws/btcusdt@ticker/ethusdt@ticker`
    pub fn build_ws_url(&self) -> String {
        let streams = self
            .symbols
            .iter()
            .map(|s| format!("{}{}", s, TICKER_STREAM_SUFFIX))
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.base_url.trim_end_matches('/'), streams)
    }

    /// Run the message processing loop
    async fn run_message_loop(mut ws_rx: mpsc::Receiver<WsMessage>, tick_tx: mpsc::Sender<Tick>) {
        while let Some(msg) = ws_rx.recv().await {
            match msg {
                WsMessage::Text(text) => match decode_ticker(&text) {
                    Ok(tick) => {
                        if tick_tx.send(tick).await.is_err() {
                            tracing::debug!("Tick receiver dropped, stopping feed");
                            break;
                        }
                    }
                    Err(e) => {
                        telemetry::increment(CounterMetric::DecodeErrors);
                        tracing::debug!(error = %e, "Dropping undecodable feed message");
                    }
                },
                WsMessage::Connected => {
                    tracing::info!("Binance feed connected");
                }
                WsMessage::Disconnected => {
                    tracing::warn!("Binance feed disconnected");
                    break;
                }
                WsMessage::Reconnecting { attempt } => {
                    tracing::warn!(attempt, "Binance feed reconnecting...");
                }
            }
        }
    }
}

#[async_trait]
impl PriceFeed for BinanceTickerFeed {
    async fn subscribe(&self, shutdown: Shutdown) -> anyhow::Result<mpsc::Receiver<Tick>> {
        if self.symbols.is_empty() {
            anyhow::bail!("No symbols to subscribe to");
        }

        let (tick_tx, tick_rx) = mpsc::channel(1024);
        let url = self.build_ws_url();

        tracing::info!(symbols = ?self.symbols, "Subscribing to Binance ticker streams");

        let client = WsClient::new(WsConfig::new(url).reconnect(self.reconnect));
        let ws_rx = client.connect(shutdown);

        tokio::spawn(async move {
            Self::run_message_loop(ws_rx, tick_tx).await;
        });

        Ok(tick_rx)
    }
}
