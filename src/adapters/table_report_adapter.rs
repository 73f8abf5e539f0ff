//! Plain-text table rendering of a ranked screen for the terminal.

use std::io::Write;

use crate::domain::error::ScreenerError;
use crate::domain::indicator::sma::DEFAULT_SMA_PERIOD;
use crate::domain::screener::ScreenReport;
use crate::ports::report_port::ReportPort;

pub const NO_MATCHES: &str = "No stocks met the criteria.";

pub struct TableReportAdapter {
    sma_period: usize,
}

impl TableReportAdapter {
    pub fn new(sma_period: usize) -> Self {
        Self { sma_period }
    }
}

impl Default for TableReportAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_SMA_PERIOD)
    }
}

impl ReportPort for TableReportAdapter {
    fn write(&self, report: &ScreenReport, out: &mut dyn Write) -> Result<(), ScreenerError> {
        if !report.has_matches() {
            writeln!(out, "{}", NO_MATCHES)?;
            return Ok(());
        }

        let header = vec![
            "Stock".to_string(),
            "RSI".to_string(),
            format!("SMA_{}", self.sma_period),
            "Close".to_string(),
            "Score".to_string(),
        ];
        let rows: Vec<Vec<String>> = report
            .results
            .iter()
            .map(|r| {
                vec![
                    r.symbol.clone(),
                    format!("{:.2}", r.rsi),
                    format!("{:.2}", r.sma),
                    format!("{:.2}", r.close),
                    format!("{:.2}", r.score),
                ]
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                rows.iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header[col].chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for row in std::iter::once(&header).chain(rows.iter()) {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(col, (cell, &width))| {
                    if col == 0 {
                        format!("{:<width$}", cell)
                    } else {
                        format!("{:>width$}", cell)
                    }
                })
                .collect();
            writeln!(out, "{}", cells.join("  "))?;
        }

        writeln!(
            out,
            "\n{} of {} symbols matched",
            report.results.len(),
            report.screened
        )?;
        Ok(())
    }
}
