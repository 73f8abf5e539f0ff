//! CSV directory data adapter.
//!
//! One file per symbol, `<dir>/<SYMBOL>.csv`, with header
//! `date,open,high,low,close,volume` and ISO dates.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn field<T: FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<T, ScreenerError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| ScreenerError::data_source(symbol, format!("missing {} column", name)))?
        .trim()
        .parse()
        .map_err(|e| ScreenerError::data_source(symbol, format!("invalid {} value: {}", name, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScreenerError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            ScreenerError::data_source(symbol, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| {
                ScreenerError::data_source(symbol, format!("CSV parse error: {}", e))
            })?;

            let date_str: String = field(&record, 0, "date", symbol)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                ScreenerError::data_source(symbol, format!("invalid date format: {}", e))
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: field(&record, 1, "open", symbol)?,
                high: field(&record, 2, "high", symbol)?,
                low: field(&record, 3, "low", symbol)?,
                close: field(&record, 4, "close", symbol)?,
                volume: field(&record, 5, "volume", symbol)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
