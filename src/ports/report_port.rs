//! Report output port trait.

use std::io::Write;

use crate::domain::error::ScreenerError;
use crate::domain::screener::ScreenReport;

/// Port for presenting or exporting a ranked screen.
pub trait ReportPort {
    fn write(&self, report: &ScreenReport, out: &mut dyn Write) -> Result<(), ScreenerError>;

    /// Default implementation: renders into a buffer and returns it as text.
    fn render(&self, report: &ScreenReport) -> Result<String, ScreenerError> {
        let mut buf = Vec::new();
        self.write(report, &mut buf)?;
        String::from_utf8(buf).map_err(|e| ScreenerError::Parse {
            reason: format!("report is not valid UTF-8: {}", e),
        })
    }
}
