//! Momentum screener.
//!
//! For each symbol: fetch a trailing window of daily bars, compute RSI and
//! SMA of close, keep the symbol iff latest RSI > threshold and latest close >
//! latest SMA, and score it as `RSI + (close - SMA)`. Results are ranked by
//! score, descending.

use std::fmt;

use chrono::{Months, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::domain::error::ScreenerError;
use crate::domain::indicator::rsi::{calculate_rsi, DEFAULT_RSI_PERIOD};
use crate::domain::indicator::sma::{calculate_sma, DEFAULT_SMA_PERIOD};
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

pub const DEFAULT_RSI_THRESHOLD: f64 = 60.0;
pub const MIN_BARS: usize = 20;
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerConfig {
    pub rsi_period: usize,
    pub sma_period: usize,
    pub rsi_threshold: f64,
    pub min_bars: usize,
    pub lookback_months: u32,
    /// Last day of the requested history window.
    pub as_of: NaiveDate,
}

impl ScreenerConfig {
    pub fn as_of(as_of: NaiveDate) -> Self {
        Self {
            rsi_period: DEFAULT_RSI_PERIOD,
            sma_period: DEFAULT_SMA_PERIOD,
            rsi_threshold: DEFAULT_RSI_THRESHOLD,
            min_bars: MIN_BARS,
            lookback_months: DEFAULT_LOOKBACK_MONTHS,
            as_of,
        }
    }

    /// Inclusive (start, end) dates of the history window.
    pub fn history_window(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .as_of
            .checked_sub_months(Months::new(self.lookback_months))
            .unwrap_or(NaiveDate::MIN);
        (start, self.as_of)
    }
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self::as_of(Utc::now().date_naive())
    }
}

/// Latest indicator readings for one symbol, unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub rsi: f64,
    pub sma: f64,
    pub close: f64,
}

impl Snapshot {
    pub fn score(&self) -> f64 {
        self.rsi + (self.close - self.sma)
    }

    pub fn qualifies(&self, rsi_threshold: f64) -> bool {
        self.rsi > rsi_threshold && self.close > self.sma
    }
}

/// One ranked row. All numeric fields are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningResult {
    pub symbol: String,
    pub rsi: f64,
    pub sma: f64,
    pub close: f64,
    pub score: f64,
}

impl ScreeningResult {
    pub fn from_snapshot(symbol: &str, snapshot: &Snapshot) -> Self {
        Self {
            symbol: symbol.to_string(),
            rsi: round2(snapshot.rsi),
            sma: round2(snapshot.sma),
            close: round2(snapshot.close),
            score: round2(snapshot.score()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Qualified(ScreeningResult),
    Rejected(Snapshot),
    InsufficientData { bars: usize },
    /// Fetch or compute failure; becomes a warning.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenWarning {
    pub symbol: String,
    pub message: String,
}

impl fmt::Display for ScreenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error processing {}: {}", self.symbol, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub bars: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReport {
    /// Qualifying symbols, highest score first.
    pub results: Vec<ScreeningResult>,
    pub warnings: Vec<ScreenWarning>,
    pub skipped: Vec<SkippedSymbol>,
    pub screened: usize,
}

impl ScreenReport {
    pub fn has_matches(&self) -> bool {
        !self.results.is_empty()
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Applies indicators and the selection rule to already-fetched bars.
pub fn evaluate_bars(symbol: &str, bars: &[OhlcvBar], config: &ScreenerConfig) -> SymbolOutcome {
    if bars.is_empty() || bars.len() < config.min_bars {
        return SymbolOutcome::InsufficientData { bars: bars.len() };
    }

    if let Some(bad) = bars.iter().find(|b| !b.close.is_finite()) {
        let err = ScreenerError::Compute {
            symbol: symbol.to_string(),
            reason: format!("non-finite close on {}", bad.date),
        };
        return SymbolOutcome::Failed(err.to_string());
    }

    let rsi = calculate_rsi(bars, config.rsi_period).latest();
    let sma = calculate_sma(bars, config.sma_period).latest();
    let close = bars[bars.len() - 1].close;

    let (Some(rsi), Some(sma)) = (rsi, sma) else {
        return SymbolOutcome::InsufficientData { bars: bars.len() };
    };

    let snapshot = Snapshot { rsi, sma, close };
    if snapshot.qualifies(config.rsi_threshold) {
        SymbolOutcome::Qualified(ScreeningResult::from_snapshot(symbol, &snapshot))
    } else {
        SymbolOutcome::Rejected(snapshot)
    }
}

pub fn evaluate_symbol(
    data_port: &dyn DataPort,
    symbol: &str,
    config: &ScreenerConfig,
) -> SymbolOutcome {
    let (start, end) = config.history_window();
    match data_port.fetch_daily(symbol, start, end) {
        Ok(bars) => evaluate_bars(symbol, &bars, config),
        Err(e) => SymbolOutcome::Failed(e.to_string()),
    }
}

pub fn run(data_port: &dyn DataPort, symbols: &[String], config: &ScreenerConfig) -> ScreenReport {
    let mut report = ScreenReport {
        screened: symbols.len(),
        ..ScreenReport::default()
    };

    for symbol in symbols {
        match evaluate_symbol(data_port, symbol, config) {
            SymbolOutcome::Qualified(result) => {
                debug!(symbol = %symbol, rsi = result.rsi, score = result.score, "qualified");
                report.results.push(result);
            }
            SymbolOutcome::Rejected(snapshot) => {
                debug!(
                    symbol = %symbol,
                    rsi = snapshot.rsi,
                    close = snapshot.close,
                    sma = snapshot.sma,
                    "rejected"
                );
            }
            SymbolOutcome::InsufficientData { bars } => {
                debug!(symbol = %symbol, bars, minimum = config.min_bars, "insufficient data");
                report.skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    bars,
                });
            }
            SymbolOutcome::Failed(message) => {
                warn!(symbol = %symbol, error = %message, "skipping symbol");
                report.warnings.push(ScreenWarning {
                    symbol: symbol.clone(),
                    message,
                });
            }
        }
    }

    report
        .results
        .sort_by(|a, b| b.score.total_cmp(&a.score));

    info!(
        screened = report.screened,
        matched = report.results.len(),
        warnings = report.warnings.len(),
        skipped = report.skipped.len(),
        "screen complete"
    );

    report
}
