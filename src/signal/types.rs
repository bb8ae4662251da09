//! Signal types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Neutral,
}

/// A derived trade signal for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Upper-case symbol
    pub symbol: String,
    /// Recommended action
    pub signal: SignalAction,
    /// Human-readable reason
    pub reason: String,
    /// RSI(14) at the latest price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    /// SMA(5) at the latest price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_short: Option<f64>,
    /// SMA(20) at the latest price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_long: Option<f64>,
    /// Evaluation time
    pub timestamp: DateTime<Utc>,
}

impl Signal {
    /// Neutral signal for histories too short to evaluate
    pub fn insufficient_data(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            signal: SignalAction::Neutral,
            reason: super::INSUFFICIENT_DATA.to_string(),
            rsi: None,
            sma_short: None,
            sma_long: None,
            timestamp: Utc::now(),
        }
    }
}
