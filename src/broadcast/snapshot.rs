//! Market snapshot message

use crate::store::{PriceStore, Quote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    AllPrices,
}

/// Full price map pushed to every subscriber on each broadcast tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(rename = "type")]
    pub kind: SnapshotKind,
    /// Quote per symbol
    pub data: BTreeMap<String, Quote>,
    /// Last update of the reference symbol, null before its first tick
    pub timestamp: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    /// Copy the store's current quotes
    pub async fn capture(store: &PriceStore, reference_symbol: &str) -> Self {
        Self::from_quotes(store.snapshot().await, reference_symbol)
    }

    pub fn from_quotes(data: BTreeMap<String, Quote>, reference_symbol: &str) -> Self {
        let timestamp = data.get(reference_symbol).map(|q| q.last_updated);
        Self {
            kind: SnapshotKind::AllPrices,
            data,
            timestamp,
        }
    }
}
