//! CSV export of a ranked screen.
//!
//! Column order is fixed: Stock, RSI, SMA_<n>, Close, Score.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::error::ScreenerError;
use crate::domain::indicator::sma::DEFAULT_SMA_PERIOD;
use crate::domain::screener::ScreenReport;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_CSV_FILE_NAME: &str = "momentum_screener_results.csv";

pub struct CsvReportAdapter {
    sma_period: usize,
}

impl CsvReportAdapter {
    pub fn new(sma_period: usize) -> Self {
        Self { sma_period }
    }

    pub fn header(&self) -> [String; 5] {
        [
            "Stock".to_string(),
            "RSI".to_string(),
            format!("SMA_{}", self.sma_period),
            "Close".to_string(),
            "Score".to_string(),
        ]
    }

    pub fn write_file(&self, report: &ScreenReport, path: &Path) -> Result<(), ScreenerError> {
        let mut file = File::create(path)?;
        self.write(report, &mut file)?;
        file.flush()?;
        Ok(())
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_SMA_PERIOD)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &ScreenReport, out: &mut dyn Write) -> Result<(), ScreenerError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(self.header())?;
        for row in &report.results {
            wtr.write_record([
                row.symbol.clone(),
                format!("{:.2}", row.rsi),
                format!("{:.2}", row.sma),
                format!("{:.2}", row.close),
                format!("{:.2}", row.score),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
