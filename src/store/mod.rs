//! Price state store
//!
//! Latest quote plus bounded price history per symbol, shared between the
//! feed ingestion task, the broadcast loops and the query facade.

mod history;
mod quote;

pub use history::{PriceHistory, DEFAULT_HISTORY_CAPACITY};
pub use quote::{display_name, AssetClass, Quote};

use crate::feed::Tick;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreState {
    quotes: HashMap<String, Quote>,
    histories: HashMap<String, PriceHistory>,
}

/// Shared handle to the process-wide price state
///
/// Quote and history for a symbol are written under one lock, so readers never
/// see a quote whose price is missing from the history.
#[derive(Debug, Clone)]
pub struct PriceStore {
    state: Arc<RwLock<StoreState>>,
    capacity: usize,
}

impl PriceStore {
    /// Create a store with empty histories for `tracked` symbols
    pub fn new<I, S>(tracked: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let histories = tracked
            .into_iter()
            .map(|s| (normalize(s.as_ref()), PriceHistory::new(capacity)))
            .collect();

        Self {
            state: Arc::new(RwLock::new(StoreState {
                quotes: HashMap::new(),
                histories,
            })),
            capacity,
        }
    }

    /// History capacity per symbol
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replace the quote for `symbol` and append `price` to its history
    pub async fn update(
        &self,
        symbol: &str,
        price: f64,
        change_percent: f64,
        asset_class: AssetClass,
    ) -> Quote {
        self.update_at(symbol, price, change_percent, asset_class, Utc::now())
            .await
    }

    /// Apply a normalized feed tick
    pub async fn apply(&self, tick: &Tick) -> Quote {
        self.update_at(
            &tick.symbol,
            tick.price,
            tick.change_percent,
            tick.asset_class,
            tick.timestamp,
        )
        .await
    }

    async fn update_at(
        &self,
        symbol: &str,
        price: f64,
        change_percent: f64,
        asset_class: AssetClass,
        timestamp: DateTime<Utc>,
    ) -> Quote {
        let symbol = normalize(symbol);
        let quote = Quote::new(symbol.clone(), price, change_percent, asset_class, timestamp);

        let mut state = self.state.write().await;
        state
            .histories
            .entry(symbol.clone())
            .or_insert_with(|| PriceHistory::new(self.capacity))
            .push(price);
        state.quotes.insert(symbol, quote.clone());

        quote
    }

    /// All current quotes, ordered by symbol
    pub async fn snapshot(&self) -> BTreeMap<String, Quote> {
        let state = self.state.read().await;
        state
            .quotes
            .iter()
            .map(|(symbol, quote)| (symbol.clone(), quote.clone()))
            .collect()
    }

    /// Latest quote for a symbol
    pub async fn quote(&self, symbol: &str) -> Option<Quote> {
        let state = self.state.read().await;
        state.quotes.get(&normalize(symbol)).cloned()
    }

    /// Price history for a symbol, oldest first; empty when unknown
    pub async fn history(&self, symbol: &str) -> Vec<f64> {
        let state = self.state.read().await;
        state
            .histories
            .get(&normalize(symbol))
            .map(PriceHistory::to_vec)
            .unwrap_or_default()
    }

    /// Quote and history for a symbol read under one lock
    pub async fn quote_with_history(&self, symbol: &str) -> (Option<Quote>, Vec<f64>) {
        let symbol = normalize(symbol);
        let state = self.state.read().await;
        let quote = state.quotes.get(&symbol).cloned();
        let history = state
            .histories
            .get(&symbol)
            .map(PriceHistory::to_vec)
            .unwrap_or_default();
        (quote, history)
    }

    /// Every symbol with a history slot, sorted
    pub async fn symbols(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut symbols: Vec<String> = state.histories.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Number of symbols that have received at least one quote
    pub async fn quote_count(&self) -> usize {
        self.state.read().await.quotes.len()
    }
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
