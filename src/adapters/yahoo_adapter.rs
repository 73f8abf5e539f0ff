//! Yahoo Finance chart API data adapter.
//!
//! Requests `{base_url}/v8/finance/chart/{SYMBOL}{suffix}` for daily bars.
//! NSE tickers take the `.NS` suffix.

use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

const USER_AGENT: &str = concat!("momentum-screener/", env!("CARGO_PKG_VERSION"));

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    symbol_suffix: String,
}

impl YahooAdapter {
    pub fn new(
        base_url: &str,
        symbol_suffix: &str,
        timeout: Duration,
    ) -> Result<Self, ScreenerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ScreenerError::data_source("yahoo", format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            symbol_suffix: symbol_suffix.to_string(),
        })
    }

    pub fn ticker(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.symbol_suffix)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Converts a chart API body into bars within `[start_date, end_date]`.
/// Rows with any missing price are dropped.
pub fn parse_chart(
    symbol: &str,
    body: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<OhlcvBar>, ScreenerError> {
    let response: ChartResponse = serde_json::from_str(body).map_err(|e| {
        ScreenerError::data_source(symbol, format!("invalid chart response: {}", e))
    })?;

    if let Some(err) = response.chart.error {
        return Err(ScreenerError::data_source(
            symbol,
            format!("{}: {}", err.code, err.description),
        ));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        if date < start_date || date > end_date {
            continue;
        }
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        ) else {
            continue;
        };
        bars.push(OhlcvBar {
            symbol: symbol.to_string(),
            date,
            open,
            high,
            low,
            close,
            volume: value_at(&quote.volume, i).unwrap_or(0.0) as i64,
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// A non-success status is an error before the body is parsed.
fn decode_response(
    symbol: &str,
    status: StatusCode,
    body: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<OhlcvBar>, ScreenerError> {
    if !status.is_success() {
        return Err(ScreenerError::data_source(
            symbol,
            format!("HTTP status: {}", status),
        ));
    }
    parse_chart(symbol, body, start_date, end_date)
}

fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

impl DataPort for YahooAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScreenerError> {
        let ticker = self.ticker(symbol);
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let period_end = end_date.succ_opt().unwrap_or(end_date);
        let params = [
            ("period1", day_start_timestamp(start_date).to_string()),
            ("period2", day_start_timestamp(period_end).to_string()),
            ("interval", "1d".to_string()),
        ];

        debug!(symbol, ticker = %ticker, %start_date, %end_date, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| ScreenerError::data_source(symbol, format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            ScreenerError::data_source(symbol, format!("failed to read body: {}", e))
        })?;

        decode_response(symbol, status, &body, start_date, end_date)
    }
}
