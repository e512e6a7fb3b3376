//! CSV report generation

use crate::crawler::RunReport;
use crate::output::OutputResult;
use std::io::Write;

const HEADER: [&str; 4] = ["url", "page", "status", "reason"];

/// Writes the broken links as CSV with a header row
///
/// Columns: `url,page,status,reason`. The status column is empty when no
/// response was received.
pub fn write_csv_report<W: Write>(report: &RunReport, out: W) -> OutputResult<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;

    for error in &report.errors {
        let status = error.status.map(|s| s.to_string()).unwrap_or_default();
        writer.write_record([
            error.url.as_str(),
            error.page.as_str(),
            status.as_str(),
            error.reason.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
