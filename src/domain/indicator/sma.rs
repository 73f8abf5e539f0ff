//! Simple Moving Average of closing prices.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n) / n
//! Warmup: first (n-1) values are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{close_prices, OhlcvBar};

pub const DEFAULT_SMA_PERIOD: usize = 10;

pub fn sma_values(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }
    let warmup = period - 1;

    (0..prices.len())
        .map(|i| {
            if i < warmup {
                return None;
            }
            let window = &prices[i + 1 - period..=i];
            Some(window.iter().sum::<f64>() / period as f64)
        })
        .collect()
}

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = sma_values(&close_prices(bars), period);
    IndicatorSeries::from_values(
        IndicatorType::Sma(period),
        bars.iter().map(|b| b.date),
        values,
    )
}
