//! Configuration types for trademind

use crate::telemetry::LogFormat;
use crate::ws::ReconnectPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding `[equity].api_key`
pub const EQUITY_API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub broadcast: BroadcastSettings,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub equity: EquityConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Base streaming URL, stream names are appended as path segments
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Crypto symbols ingested from the ticker streams
    #[serde(default = "default_crypto_symbols")]
    pub crypto_symbols: Vec<String>,

    /// Equity symbols tracked structurally (not ingested)
    #[serde(default = "default_stock_symbols")]
    pub stock_symbols: Vec<String>,

    /// Maximum prices retained per symbol
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Reconnection attempts before giving up (0 = infinite)
    #[serde(default)]
    pub max_reconnect_attempts: u32,

    #[serde(default = "default_initial_reconnect_delay_ms")]
    pub initial_reconnect_delay_ms: u64,

    #[serde(default = "default_max_reconnect_delay_ms")]
    pub max_reconnect_delay_ms: u64,
}

fn default_base_url() -> String {
    "wss://stream.binance.com:9443/ws".to_string()
}
fn default_crypto_symbols() -> Vec<String> {
    ["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_stock_symbols() -> Vec<String> {
    ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA", "META", "JPM"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_history_capacity() -> usize {
    100
}
fn default_initial_reconnect_delay_ms() -> u64 {
    1_000
}
fn default_max_reconnect_delay_ms() -> u64 {
    60_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            crypto_symbols: default_crypto_symbols(),
            stock_symbols: default_stock_symbols(),
            history_capacity: default_history_capacity(),
            max_reconnect_attempts: 0,
            initial_reconnect_delay_ms: default_initial_reconnect_delay_ms(),
            max_reconnect_delay_ms: default_max_reconnect_delay_ms(),
        }
    }
}

impl FeedConfig {
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(
            self.max_reconnect_attempts,
            Duration::from_millis(self.initial_reconnect_delay_ms),
            Duration::from_millis(self.max_reconnect_delay_ms),
        )
    }
}

/// Snapshot broadcast configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BroadcastSettings {
    /// Period between snapshots sent to each subscriber
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Symbol whose last update stamps each snapshot
    #[serde(default = "default_reference_symbol")]
    pub reference_symbol: String,
}

fn default_interval_ms() -> u64 {
    1_000
}
fn default_reference_symbol() -> String {
    "BTCUSDT".to_string()
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            reference_symbol: default_reference_symbol(),
        }
    }
}

/// HTTP / WebSocket server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Equity data provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EquityConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

fn default_api_key() -> String {
    "demo".to_string()
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus exporter port; no exporter when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("No crypto symbols configured")]
    NoCryptoSymbols,
    #[error("History capacity {0} is below the 20 samples signals need")]
    HistoryTooShort(usize),
    #[error("Broadcast interval must be non-zero")]
    ZeroBroadcastInterval,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.normalize();
        Ok(config)
    }

    /// Load configuration, using defaults only when the file does not exist.
    ///
    /// Any other failure, such as a parse error, is returned.
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                eprintln!(
                    "Config file {} not found, using default configuration",
                    path.display()
                );
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(EQUITY_API_KEY_ENV) {
            if !key.is_empty() {
                self.equity.api_key = key;
            }
        }
    }

    /// Check invariants the runtime relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.crypto_symbols.is_empty() {
            return Err(ConfigError::NoCryptoSymbols);
        }
        if self.feed.history_capacity < crate::signal::SMA_LONG {
            return Err(ConfigError::HistoryTooShort(self.feed.history_capacity));
        }
        if self.broadcast.interval_ms == 0 {
            return Err(ConfigError::ZeroBroadcastInterval);
        }
        Ok(())
    }

    /// Upper-case every configured symbol
    pub fn normalize(&mut self) {
        for s in self
            .feed
            .crypto_symbols
            .iter_mut()
            .chain(self.feed.stock_symbols.iter_mut())
        {
            *s = s.trim().to_uppercase();
        }
        self.broadcast.reference_symbol = self.broadcast.reference_symbol.trim().to_uppercase();
    }

    /// API key with all but the first characters masked, for logs
    pub fn redacted_api_key(&self) -> String {
        let key = &self.equity.api_key;
        let visible: String = key.chars().take(2).collect();
        format!("{}***", visible)
    }
}
