//! Market sentiment providers
//!
//! Produces a short narrative for a symbol from its recent prices. The only
//! implementation today is a canned-phrase generator.

mod canned;

pub use canned::CannedSentiment;

use async_trait::async_trait;

/// Source of free-text market commentary
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Describe `symbol` given its price history (oldest first).
    ///
    /// Callers only invoke this with a non-empty history; implementations
    /// must return a non-empty string.
    async fn market_sentiment(&self, symbol: &str, prices: &[f64]) -> String;
}
