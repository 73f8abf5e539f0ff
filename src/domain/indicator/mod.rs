//! Technical indicator implementations.
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorPoint`: a dated value, `None` during warmup
//! - `IndicatorSeries`: a time series aligned one-to-one with the input bars

pub mod rsi;
pub mod sma;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl IndicatorPoint {
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Pairs raw values with the dates of the bars they were computed from.
    pub fn from_values(
        indicator_type: IndicatorType,
        dates: impl IntoIterator<Item = NaiveDate>,
        values: Vec<Option<f64>>,
    ) -> Self {
        let values = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| IndicatorPoint { date, value })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    /// Value at the most recent bar, `None` if the series is empty or still warming up.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().and_then(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}
