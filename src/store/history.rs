//! Bounded rolling price history

use std::collections::VecDeque;

/// Default number of prices retained per symbol
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// FIFO price window, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    capacity: usize,
    prices: VecDeque<f64>,
}

impl PriceHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            prices: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a price, evicting the oldest once over capacity
    pub fn push(&mut self, price: f64) {
        self.prices.push_back(price);
        while self.prices.len() > self.capacity {
            self.prices.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<f64> {
        self.prices.back().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.prices.iter().copied().collect()
    }
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
