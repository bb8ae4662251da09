//! Technical indicators over a price sequence (oldest first)

/// RSI reported when the window has neither gains nor losses
pub const FLAT_RSI: f64 = 50.0;

/// Relative strength index with Wilder smoothing, evaluated at the last price.
///
/// Gains and losses are smoothed with an exponential mean (alpha = 1/period)
/// seeded at zero for the first sample. Returns `None` with fewer than
/// `period` prices.
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for pair in prices.windows(2) {
        let change = pair[1] - pair[0];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
        avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;
    }

    let value = if avg_loss == 0.0 && avg_gain == 0.0 {
        FLAT_RSI
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    };

    Some(value)
}

/// Mean of the trailing `window` prices
pub fn sma(prices: &[f64], window: usize) -> Option<f64> {
    if window == 0 || prices.len() < window {
        return None;
    }
    let tail = &prices[prices.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}
