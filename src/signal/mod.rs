//! Signal generation module
//!
//! Derives BUY/SELL/NEUTRAL recommendations from a symbol's price history
//! using RSI extremes and a moving-average crossover.

mod engine;
pub mod indicators;
mod types;

pub use engine::{
    generate_signal, INSUFFICIENT_DATA, OVERBOUGHT, OVERSOLD, RSI_PERIOD, SMA_LONG, SMA_SHORT,
};
pub use types::{Signal, SignalAction};
