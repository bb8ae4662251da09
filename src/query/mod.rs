//! Query facade
//!
//! On-demand reads over the price store: signals, sentiment and a price
//! overview. Unknown symbols are not errors.

use crate::sentiment::SentimentProvider;
use crate::signal::{generate_signal, Signal};
use crate::store::{PriceStore, Quote};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Insight returned when a symbol has no price history yet
pub const DEFAULT_INSIGHT: &str = "Stable trend expected.";

/// Sentiment text for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub symbol: String,
    pub insight: String,
}

/// Read-only entry point used by the HTTP surface
#[derive(Clone)]
pub struct QueryFacade {
    store: PriceStore,
    sentiment: Arc<dyn SentimentProvider>,
}

impl QueryFacade {
    pub fn new(store: PriceStore, sentiment: Arc<dyn SentimentProvider>) -> Self {
        Self { store, sentiment }
    }

    pub fn store(&self) -> &PriceStore {
        &self.store
    }

    /// Current signal for `symbol` (case-insensitive)
    pub async fn signal(&self, symbol: &str) -> Signal {
        let symbol = symbol.trim().to_uppercase();
        let prices = self.store.history(&symbol).await;
        generate_signal(&symbol, &prices)
    }

    /// Sentiment narrative for `symbol` (case-insensitive)
    pub async fn insight(&self, symbol: &str) -> Insight {
        let symbol = symbol.trim().to_uppercase();
        let prices = self.store.history(&symbol).await;

        let insight = if prices.is_empty() {
            DEFAULT_INSIGHT.to_string()
        } else {
            self.sentiment.market_sentiment(&symbol, &prices).await
        };

        Insight { symbol, insight }
    }

    /// Every current quote, ordered by symbol
    pub async fn prices(&self) -> Vec<Quote> {
        self.store.snapshot().await.into_values().collect()
    }
}
