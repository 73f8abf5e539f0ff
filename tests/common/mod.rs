#![allow(dead_code)]

use chrono::NaiveDate;
use momentum_screener::domain::error::ScreenerError;
pub use momentum_screener::domain::ohlcv::OhlcvBar;
use momentum_screener::domain::screener::ScreenerConfig;
use momentum_screener::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Closes giving RSI(14) = 70, SMA(10) = 100 and a last close of 110.
pub const QUALIFYING_CLOSES: [f64; 20] = [
    100.0, 100.0, 100.0, 100.0, 100.0, 102.0, 102.0, 99.0, 99.0, 101.0, 98.0, 98.0, 98.0, 98.0,
    99.0, 99.0, 99.0, 100.0, 101.0, 110.0,
];

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn request_count(&self, symbol: &str) -> usize {
        self.requests.borrow().iter().filter(|s| *s == symbol).count()
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScreenerError> {
        self.requests.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScreenerError::data_source(symbol, reason.clone()));
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day starting 2024-06-01.
pub fn bars_from_closes(symbol: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 6, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            symbol: symbol.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn generate_bars(symbol: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    bars_from_closes(symbol, &closes)
}

/// Alternating up/down closes; RSI sits at 50.
pub fn choppy_bars(symbol: &str, count: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count)
        .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
        .collect();
    bars_from_closes(symbol, &closes)
}

pub fn screener_config() -> ScreenerConfig {
    ScreenerConfig::as_of(date(2024, 6, 30))
}

pub fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Writes `<dir>/<SYMBOL>.csv` in the layout the CSV data adapter reads.
pub fn write_csv_bars(dir: &Path, symbol: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
