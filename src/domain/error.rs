//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for the screener.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("data source error for {symbol}: {reason}")]
    DataSource { symbol: String, reason: String },

    #[error("parse error: {reason}")]
    Parse { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("cannot compute indicators for {symbol}: {reason}")]
    Compute { symbol: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScreenerError {
    pub fn data_source(symbol: &str, reason: impl Into<String>) -> Self {
        ScreenerError::DataSource {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        ScreenerError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) | ScreenerError::Csv(_) => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::DataSource { .. } | ScreenerError::Parse { .. } => 3,
            ScreenerError::Universe(_) => 4,
            ScreenerError::Compute { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
