//! Configuration validation.
//!
//! Every key is optional; present values must be usable before a screen runs.

use crate::domain::error::ScreenerError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATA_SOURCES: &[&str] = &["yahoo", "csv"];
pub const LOG_FORMATS: &[&str] = &["text", "json"];

pub fn validate_screener_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_positive(config, "screener", "rsi_period")?;
    validate_positive(config, "screener", "sma_period")?;
    validate_positive(config, "screener", "min_bars")?;
    validate_positive(config, "screener", "lookback_months")?;
    validate_threshold(config)?;
    validate_as_of(config)?;
    validate_symbols(config)?;
    validate_data_source(config)?;
    validate_positive(config, "data", "timeout_secs")?;
    validate_log_format(config)?;
    Ok(())
}

fn validate_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), ScreenerError> {
    let Some(raw) = config.get_non_empty(section, key) else {
        return Ok(());
    };
    match raw.parse::<i64>() {
        Ok(v) if v > 0 => Ok(()),
        Ok(_) => Err(ScreenerError::invalid(
            section,
            key,
            format!("{} must be positive", key),
        )),
        Err(_) => Err(ScreenerError::invalid(
            section,
            key,
            format!("{} must be an integer", key),
        )),
    }
}

fn validate_threshold(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let Some(raw) = config.get_non_empty("screener", "rsi_threshold") else {
        return Ok(());
    };
    match raw.parse::<f64>() {
        Ok(v) if (0.0..=100.0).contains(&v) => Ok(()),
        _ => Err(ScreenerError::invalid(
            "screener",
            "rsi_threshold",
            "rsi_threshold must be a number between 0 and 100",
        )),
    }
}

pub fn parse_as_of(value: &str) -> Result<NaiveDate, ScreenerError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ScreenerError::invalid(
            "screener",
            "as_of",
            "invalid as_of format, expected YYYY-MM-DD",
        )
    })
}

fn validate_as_of(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_non_empty("screener", "as_of") {
        Some(s) => parse_as_of(&s).map(|_| ()),
        None => Ok(()),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_non_empty("screener", "symbols") {
        Some(s) => parse_symbols(&s)
            .map(|_| ())
            .map_err(|e| ScreenerError::invalid("screener", "symbols", e.to_string())),
        None => Ok(()),
    }
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let source = config.get_non_empty("data", "source");
    if let Some(ref s) = source {
        if !DATA_SOURCES.contains(&s.to_lowercase().as_str()) {
            return Err(ScreenerError::invalid(
                "data",
                "source",
                format!(
                    "unknown data source '{}', expected one of: {}",
                    s,
                    DATA_SOURCES.join(", ")
                ),
            ));
        }
    }

    let wants_csv = source.is_some_and(|s| s.eq_ignore_ascii_case("csv"));
    if wants_csv && config.get_non_empty("data", "csv_dir").is_none() {
        return Err(ScreenerError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
        });
    }
    Ok(())
}

fn validate_log_format(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_non_empty("logging", "format") {
        Some(f) if !LOG_FORMATS.contains(&f.to_lowercase().as_str()) => {
            Err(ScreenerError::invalid(
                "logging",
                "format",
                format!("unknown log format '{}', expected text or json", f),
            ))
        }
        _ => Ok(()),
    }
}
