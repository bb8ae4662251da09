//! Signal engine
//!
//! RSI extremes take priority over the SMA crossover: an oversold market is a
//! BUY even while the short average is still below the long one.

use super::indicators::{rsi, sma};
use super::types::{Signal, SignalAction};
use chrono::Utc;

/// RSI lookback
pub const RSI_PERIOD: usize = 14;
/// Short moving-average window
pub const SMA_SHORT: usize = 5;
/// Long moving-average window, also the minimum history length
pub const SMA_LONG: usize = 20;
/// RSI below this is oversold
pub const OVERSOLD: f64 = 30.0;
/// RSI above this is overbought
pub const OVERBOUGHT: f64 = 70.0;

/// Reason reported for histories shorter than [`SMA_LONG`]
pub const INSUFFICIENT_DATA: &str = "Insufficient data";

/// Compute the trade signal for a symbol's price history (oldest first)
pub fn generate_signal(symbol: &str, prices: &[f64]) -> Signal {
    if prices.len() < SMA_LONG {
        return Signal::insufficient_data(symbol);
    }

    let (Some(rsi), Some(sma_short), Some(sma_long)) = (
        rsi(prices, RSI_PERIOD),
        sma(prices, SMA_SHORT),
        sma(prices, SMA_LONG),
    ) else {
        return Signal::insufficient_data(symbol);
    };

    let (signal, reason) = decide(rsi, sma_short, sma_long);

    Signal {
        symbol: symbol.to_string(),
        signal,
        reason,
        rsi: Some(rsi),
        sma_short: Some(sma_short),
        sma_long: Some(sma_long),
        timestamp: Utc::now(),
    }
}

/// First matching rule wins
fn decide(rsi: f64, sma_short: f64, sma_long: f64) -> (SignalAction, String) {
    if rsi < OVERSOLD {
        (SignalAction::Buy, format!("Oversold (RSI: {:.2})", rsi))
    } else if rsi > OVERBOUGHT {
        (SignalAction::Sell, format!("Overbought (RSI: {:.2})", rsi))
    } else if sma_short > sma_long {
        (SignalAction::Buy, "Bullish SMA Crossover".to_string())
    } else if sma_short < sma_long {
        (SignalAction::Sell, "Bearish SMA Crossover".to_string())
    } else {
        (SignalAction::Neutral, "Market stable".to_string())
    }
}
