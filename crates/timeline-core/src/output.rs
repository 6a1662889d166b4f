//! Report Logging
//!
//! Append-only JSONL logging of turn reports for the presentation and
//! analysis layers.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use timeline_events::TurnReport;

/// Writes turn reports to a JSONL file, one report per line.
pub struct ReportWriter {
    writer: Option<BufWriter<File>>,
    report_count: u64,
}

impl ReportWriter {
    /// Create a new report writer truncating the file at the given path.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            report_count: 0,
        })
    }

    /// Create a writer that discards reports (for testing).
    pub fn null() -> Self {
        Self {
            writer: None,
            report_count: 0,
        }
    }

    /// Number of reports logged so far.
    pub fn report_count(&self) -> u64 {
        self.report_count
    }

    /// Append one report to the file.
    pub fn log(&mut self, report: &TurnReport) -> std::io::Result<()> {
        self.report_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = report.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for ReportWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("failed to flush report writer: {}", e);
        }
    }
}
