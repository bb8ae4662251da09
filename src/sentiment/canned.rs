//! Canned-phrase sentiment generator

use super::SentimentProvider;
use async_trait::async_trait;
use rand::Rng;

/// Trend direction between the first and last price of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Upward,
    Downward,
}

impl Trend {
    fn of(prices: &[f64]) -> Self {
        match (prices.first(), prices.last()) {
            (Some(first), Some(last)) if last > first => Trend::Upward,
            _ => Trend::Downward,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Trend::Upward => "upward",
            Trend::Downward => "downward",
        }
    }
}

/// Picks one of a fixed set of phrases at random
#[derive(Debug, Clone, Default)]
pub struct CannedSentiment;

impl CannedSentiment {
    pub fn new() -> Self {
        Self
    }

    /// All phrases available for the given input
    fn phrases(symbol: &str, prices: &[f64]) -> Vec<String> {
        let last_price = prices.last().copied().unwrap_or_default();
        let trend = Trend::of(prices);

        vec![
            format!(
                "AI Analysis for {}: The current price of ${:.2} shows a persistent {} trend.",
                symbol,
                last_price,
                trend.as_str()
            ),
            format!(
                "Machine Learning models predict high volatility for {} in the next session.",
                symbol
            ),
            format!(
                "Sentiment analysis from recent news for {} is predominantly bullish.",
                symbol
            ),
        ]
    }

    fn pick(symbol: &str, prices: &[f64]) -> String {
        let mut phrases = Self::phrases(symbol, prices);
        let index = rand::thread_rng().gen_range(0..phrases.len());
        phrases.swap_remove(index)
    }
}

#[async_trait]
impl SentimentProvider for CannedSentiment {
    async fn market_sentiment(&self, symbol: &str, prices: &[f64]) -> String {
        Self::pick(symbol, prices)
    }
}
