//! CLI definition and dispatch.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
#[cfg(feature = "yahoo")]
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::table_report_adapter::TableReportAdapter;
use crate::domain::config_validation::{parse_as_of, validate_screener_config};
use crate::domain::error::ScreenerError;
use crate::domain::indicator::rsi::DEFAULT_RSI_PERIOD;
use crate::domain::indicator::sma::DEFAULT_SMA_PERIOD;
use crate::domain::screener::{
    self, ScreenReport, ScreenerConfig, DEFAULT_LOOKBACK_MONTHS, DEFAULT_RSI_THRESHOLD, MIN_BARS,
};
use crate::domain::universe::{
    default_selection, is_default_selected, master_symbols, parse_symbols,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_SYMBOL_SUFFIX: &str = ".NS";
const DEFAULT_TIMEOUT_SECS: i64 = 10;

#[derive(Parser, Debug)]
#[command(
    name = "momentum-screener",
    about = "RSI / SMA momentum screener for NSE stocks"
)]
pub struct Cli {
    /// Log level filter; RUST_LOG takes precedence when set
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the momentum screen
    Screen {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated symbols, e.g. INFY,TCS,SBIN
        #[arg(long, conflicts_with = "all")]
        symbols: Option<String>,
        /// Screen the whole master list
        #[arg(long)]
        all: bool,
        /// Last day of the history window (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
        /// Read bars from <DIR>/<SYMBOL>.csv instead of the network
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        /// Also write results as CSV to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List the master symbol list (* marks the default selection)
    Symbols,
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Where daily bars come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Csv {
        dir: PathBuf,
    },
    Yahoo {
        base_url: String,
        symbol_suffix: String,
        timeout_secs: u64,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let log_level = cli.log_level;
    let result = match cli.command {
        Command::Screen {
            config,
            symbols,
            all,
            as_of,
            csv_dir,
            output,
            format,
        } => run_screen(
            config.as_deref(),
            log_level.as_deref(),
            ScreenOverrides {
                symbols: symbols.as_deref(),
                all,
                as_of: as_of.as_deref(),
                csv_dir: csv_dir.as_deref(),
                output: output.as_deref(),
            },
            format,
        ),
        Command::Symbols => run_symbols(&mut io::stdout().lock()),
        Command::Validate { config } => run_validate(&config, log_level.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ScreenerError> {
    FileConfigAdapter::from_file(path).map_err(|e| ScreenerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_optional_config(path: Option<&Path>) -> Result<FileConfigAdapter, ScreenerError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Installs the global subscriber once. Later calls are no-ops.
pub fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let _ = match format {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
}

fn init_tracing_from(config: &dyn ConfigPort, cli_level: Option<&str>) {
    let level = cli_level
        .map(str::to_string)
        .or_else(|| config.get_non_empty("logging", "level"))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let format = config
        .get_non_empty("logging", "format")
        .unwrap_or_else(|| "text".to_string())
        .to_lowercase();
    init_tracing(&level, &format);
}

fn config_usize(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, ScreenerError> {
    let value = config.get_int("screener", key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            ScreenerError::invalid("screener", key, format!("{} must be positive", key))
        })
}

pub fn build_screener_config(
    config: &dyn ConfigPort,
    as_of_override: Option<&str>,
) -> Result<ScreenerConfig, ScreenerError> {
    let as_of = match as_of_override
        .map(str::to_string)
        .or_else(|| config.get_non_empty("screener", "as_of"))
    {
        Some(s) => parse_as_of(&s)?,
        None => chrono::Utc::now().date_naive(),
    };

    let lookback = config_usize(config, "lookback_months", DEFAULT_LOOKBACK_MONTHS as usize)?;
    let lookback_months = u32::try_from(lookback).map_err(|_| {
        ScreenerError::invalid("screener", "lookback_months", "lookback_months is too large")
    })?;

    Ok(ScreenerConfig {
        rsi_period: config_usize(config, "rsi_period", DEFAULT_RSI_PERIOD)?,
        sma_period: config_usize(config, "sma_period", DEFAULT_SMA_PERIOD)?,
        rsi_threshold: config.get_double("screener", "rsi_threshold", DEFAULT_RSI_THRESHOLD),
        min_bars: config_usize(config, "min_bars", MIN_BARS)?,
        lookback_months,
        as_of,
    })
}

/// Symbols to screen: `--all`, then `--symbols`, then `[screener] symbols`,
/// then the default selection.
pub fn resolve_symbols(
    cli_symbols: Option<&str>,
    all: bool,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, ScreenerError> {
    if all {
        return Ok(master_symbols());
    }
    if let Some(s) = cli_symbols {
        return Ok(parse_symbols(s)?);
    }
    if let Some(s) = config.get_non_empty("screener", "symbols") {
        return Ok(parse_symbols(&s)?);
    }
    Ok(default_selection())
}

pub fn resolve_data_source(
    config: &dyn ConfigPort,
    csv_dir_override: Option<&Path>,
) -> Result<DataSource, ScreenerError> {
    if let Some(dir) = csv_dir_override {
        return Ok(DataSource::Csv {
            dir: dir.to_path_buf(),
        });
    }

    let csv_dir = config.get_non_empty("data", "csv_dir");
    let kind = config
        .get_non_empty("data", "source")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| {
            if csv_dir.is_some() {
                "csv".to_string()
            } else {
                "yahoo".to_string()
            }
        });

    match kind.as_str() {
        "csv" => {
            let dir = csv_dir.ok_or_else(|| ScreenerError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            })?;
            Ok(DataSource::Csv {
                dir: PathBuf::from(dir),
            })
        }
        "yahoo" => {
            let timeout = config.get_int("data", "timeout_secs", DEFAULT_TIMEOUT_SECS);
            let timeout_secs = u64::try_from(timeout)
                .ok()
                .filter(|t| *t > 0)
                .ok_or_else(|| {
                    ScreenerError::invalid("data", "timeout_secs", "timeout_secs must be positive")
                })?;
            Ok(DataSource::Yahoo {
                base_url: config
                    .get_non_empty("data", "base_url")
                    .unwrap_or_else(|| DEFAULT_YAHOO_URL.to_string()),
                symbol_suffix: config
                    .get_string("data", "symbol_suffix")
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|| DEFAULT_SYMBOL_SUFFIX.to_string()),
                timeout_secs,
            })
        }
        other => Err(ScreenerError::invalid(
            "data",
            "source",
            format!("unknown data source '{}'", other),
        )),
    }
}

pub fn build_data_port(source: &DataSource) -> Result<Box<dyn DataPort>, ScreenerError> {
    match source {
        DataSource::Csv { dir } => Ok(Box::new(CsvAdapter::new(dir.clone()))),
        #[cfg(feature = "yahoo")]
        DataSource::Yahoo {
            base_url,
            symbol_suffix,
            timeout_secs,
        } => {
            use crate::adapters::yahoo_adapter::YahooAdapter;
            let adapter =
                YahooAdapter::new(base_url, symbol_suffix, Duration::from_secs(*timeout_secs))?;
            Ok(Box::new(adapter))
        }
        #[cfg(not(feature = "yahoo"))]
        DataSource::Yahoo { .. } => Err(ScreenerError::invalid(
            "data",
            "source",
            "yahoo feature is required for network data; use csv_dir instead",
        )),
    }
}

/// Runs the screen and renders it.
///
/// The table (or CSV) goes to `out`, warnings go to stderr, and the CSV file is
/// written when `csv_output` is set. An empty screen is not an error.
pub fn run_screen_pipeline(
    data_port: &dyn DataPort,
    symbols: &[String],
    screener_config: &ScreenerConfig,
    format: OutputFormat,
    csv_output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<ScreenReport, ScreenerError> {
    let (start, end) = screener_config.history_window();
    info!(
        symbols = symbols.len(),
        %start,
        %end,
        "running momentum screen"
    );

    let report = screener::run(data_port, symbols, screener_config);

    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }

    let csv = CsvReportAdapter::new(screener_config.sma_period);
    match format {
        OutputFormat::Table => {
            TableReportAdapter::new(screener_config.sma_period).write(&report, out)?
        }
        OutputFormat::Csv => csv.write(&report, out)?,
    }

    if let Some(path) = csv_output {
        csv.write_file(&report, path)?;
        eprintln!("Results written to: {}", path.display());
    }

    Ok(report)
}

pub struct ScreenOverrides<'a> {
    pub symbols: Option<&'a str>,
    pub all: bool,
    pub as_of: Option<&'a str>,
    pub csv_dir: Option<&'a Path>,
    pub output: Option<&'a Path>,
}

fn run_screen(
    config_path: Option<&Path>,
    log_level: Option<&str>,
    overrides: ScreenOverrides<'_>,
    format: OutputFormat,
) -> Result<(), ScreenerError> {
    let config = load_optional_config(config_path)?;
    init_tracing_from(&config, log_level);
    validate_screener_config(&config)?;

    let screener_config = build_screener_config(&config, overrides.as_of)?;
    let symbols = resolve_symbols(overrides.symbols, overrides.all, &config)?;
    let source = resolve_data_source(&config, overrides.csv_dir)?;
    let data_port = build_data_port(&source)?;

    let csv_output = overrides
        .output
        .map(Path::to_path_buf)
        .or_else(|| config.get_non_empty("output", "csv_path").map(PathBuf::from));

    run_screen_pipeline(
        data_port.as_ref(),
        &symbols,
        &screener_config,
        format,
        csv_output.as_deref(),
        &mut io::stdout().lock(),
    )?;
    Ok(())
}

pub fn run_symbols(out: &mut dyn Write) -> Result<(), ScreenerError> {
    for symbol in master_symbols() {
        let marker = if is_default_selected(&symbol) { "*" } else { " " };
        writeln!(out, "{} {}", marker, symbol)?;
    }
    Ok(())
}

fn run_validate(config_path: &Path, log_level: Option<&str>) -> Result<(), ScreenerError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    init_tracing_from(&config, log_level);
    validate_screener_config(&config)?;

    let screener_config = build_screener_config(&config, None)?;
    let symbols = resolve_symbols(None, false, &config)?;
    let source = resolve_data_source(&config, None)?;
    let (start, end) = screener_config.history_window();

    eprintln!("\nScreen:");
    eprintln!("  RSI period:     {}", screener_config.rsi_period);
    eprintln!("  SMA period:     {}", screener_config.sma_period);
    eprintln!("  RSI threshold:  {}", screener_config.rsi_threshold);
    eprintln!("  Minimum bars:   {}", screener_config.min_bars);
    eprintln!("  Window:         {} to {}", start, end);
    eprintln!("\nSymbols ({}): {}", symbols.len(), symbols.join(", "));
    match source {
        DataSource::Csv { dir } => eprintln!("\nData: csv files in {}", dir.display()),
        DataSource::Yahoo {
            base_url,
            symbol_suffix,
            ..
        } => eprintln!("\nData: {} (suffix '{}')", base_url, symbol_suffix),
    }

    eprintln!("\nConfiguration is valid.");
    Ok(())
}
