//! Quote types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quote-asset suffix stripped from crypto pairs for display
const CRYPTO_QUOTE_ASSET: &str = "USDT";

/// Asset class of a tracked instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Equity,
}

/// Latest known quote for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Upper-case symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Display name (e.g., "BTC")
    pub name: String,
    /// Last traded price
    pub price: f64,
    /// 24h price change in percent
    pub change_percent: f64,
    /// Asset class
    #[serde(rename = "type")]
    pub asset_class: AssetClass,
    /// When this quote was written
    pub last_updated: DateTime<Utc>,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        change_percent: f64,
        asset_class: AssetClass,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let symbol = symbol.into();
        let name = display_name(&symbol, asset_class);
        Self {
            symbol,
            name,
            price,
            change_percent,
            asset_class,
            last_updated,
        }
    }
}

/// Display name for a symbol: crypto pairs lose their quote asset
pub fn display_name(symbol: &str, asset_class: AssetClass) -> String {
    match asset_class {
        AssetClass::Crypto => symbol
            .strip_suffix(CRYPTO_QUOTE_ASSET)
            .filter(|base| !base.is_empty())
            .unwrap_or(symbol)
            .to_string(),
        AssetClass::Equity => symbol.to_string(),
    }
}
