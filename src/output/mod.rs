//! Output module for run reports
//!
//! This module handles:
//! - Logging every broken link and the final verdict
//! - Writing an optional report file (Markdown or CSV)

mod csv_report;
mod markdown;

pub use csv_report::write_csv_report;
pub use markdown::format_markdown_report;

use crate::crawler::RunReport;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Unsupported report format: {0} (expected .md or .csv)")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Logs each failure and a closing summary line
///
/// Failures go to `error!`, one line each with page, URL, status (500 when
/// no response was received) and reason.
pub fn log_report(report: &RunReport) {
    let total = report.errors.len();
    for (index, error) in report.errors.iter().enumerate() {
        tracing::error!(
            "[{}/{}] Failed to validate {} on page {} Status {} {}",
            index + 1,
            total,
            error.url,
            error.page,
            error.display_status(),
            error.reason.as_deref().unwrap_or("")
        );
    }

    tracing::info!(
        "Validated {} urls from {} pages, passed: {}, failed: {}",
        report.validated(),
        report.pages,
        report.passed,
        total
    );
}

/// Writes the report to `path`, choosing the format from its extension
///
/// # Returns
///
/// * `Ok(())` - Report written
/// * `Err(OutputError)` - Unknown extension or write failure
pub fn write_report(report: &RunReport, path: &Path) -> OutputResult<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("md") | Some("markdown") => {
            std::fs::write(path, format_markdown_report(report))?;
        }
        Some("csv") => {
            let file = std::fs::File::create(path)?;
            write_csv_report(report, std::io::BufWriter::new(file))?;
        }
        _ => return Err(OutputError::UnsupportedFormat(path.display().to_string())),
    }

    Ok(())
}
