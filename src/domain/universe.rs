//! Symbol universe: the master NSE list and symbol-list parsing.

use std::collections::HashSet;

/// Master list of NSE tickers offered for screening.
pub const MASTER_SYMBOLS: [&str; 51] = [
    "TATAMOTORS", "INFY", "RELIANCE", "SBIN", "HDFCBANK", "ICICIBANK", "AXISBANK", "KOTAKBANK",
    "LT", "TCS", "ITC", "HINDUNILVR", "MARUTI", "BAJAJ-AUTO", "ULTRACEMCO", "NESTLEIND",
    "ASIANPAINT", "SUNPHARMA", "CIPLA", "DRREDDY", "ADANIPORTS", "ADANIENT", "COFORGE",
    "TATAELXSI", "IEX", "NHPC", "PFC", "BEL", "IRFC", "TRIDENT", "BHEL", "RVNL", "NBCC", "HFCL",
    "IRCTC", "LICHSGFIN", "JINDALSTEL", "TATACOMM", "ZEEL", "IDFCFIRSTB", "TVSMOTOR", "SYNGENE",
    "BALRAMCHIN", "CESC", "CANFINHOME", "GICRE", "DALBHARAT", "MPHASIS", "INDIGO", "CLEAN",
    "HINDCOPPER",
];

/// Number of leading master symbols selected when the caller names none.
pub const DEFAULT_SELECTION_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("no symbols selected")]
    EmptySelection,
}

pub fn master_symbols() -> Vec<String> {
    MASTER_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

pub fn default_selection() -> Vec<String> {
    MASTER_SYMBOLS[..DEFAULT_SELECTION_LEN]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn is_default_selected(symbol: &str) -> bool {
    MASTER_SYMBOLS[..DEFAULT_SELECTION_LEN].contains(&symbol)
}

/// Parses a comma-separated symbol list: trims, uppercases, rejects empty
/// tokens and duplicates. Order is preserved.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    if input.trim().is_empty() {
        return Err(UniverseError::EmptySelection);
    }

    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
