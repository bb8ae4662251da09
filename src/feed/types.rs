//! Price feed types

use crate::store::AssetClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A normalized price tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Upper-case trading symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Last price
    pub price: f64,
    /// 24h price change in percent
    pub change_percent: f64,
    /// Asset class of the instrument
    pub asset_class: AssetClass,
    /// Local timestamp when the tick was received
    pub timestamp: DateTime<Utc>,
}

/// Reasons a raw feed message is rejected
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, or a required field is missing or mistyped
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
    /// A message for a stream we do not handle
    #[error("Unexpected event type: {0}")]
    UnexpectedEvent(String),
    /// A string-encoded decimal that does not parse
    #[error("Invalid number in field {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    /// NaN or infinite value
    #[error("Non-finite value in field {field}")]
    NonFinite { field: &'static str },
    #[error("Empty symbol")]
    EmptySymbol,
}
