//! RSI (Relative Strength Index) over a trailing simple mean.
//!
//! delta[i] = C[i] - C[i-1], undefined at i = 0.
//! avg_gain / avg_loss are plain rolling means of the last n gains / losses,
//! not Wilder-smoothed.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n values are undefined (need n price changes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{close_prices, OhlcvBar};

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub fn rsi_values(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());
    gains.push(0.0);
    losses.push(0.0);
    for w in prices.windows(2) {
        let change = w[1] - w[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    (0..prices.len())
        .map(|i| {
            if i < period {
                return None;
            }
            let start = i + 1 - period;
            let avg_gain = gains[start..=i].iter().sum::<f64>() / period as f64;
            let avg_loss = losses[start..=i].iter().sum::<f64>() / period as f64;
            Some(rsi_from_averages(avg_gain, avg_loss))
        })
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = rsi_values(&close_prices(bars), period);
    IndicatorSeries::from_values(
        IndicatorType::Rsi(period),
        bars.iter().map(|b| b.date),
        values,
    )
}
