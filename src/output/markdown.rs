//! Markdown report generation

use crate::crawler::RunReport;

/// Formats a run report as markdown
///
/// # Arguments
///
/// * `report` - The aggregated run result
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &RunReport) -> String {
    let mut md = String::new();

    md.push_str("# Link Validation Report\n\n");

    let verdict = if report.is_success() { "passed" } else { "failed" };
    md.push_str(&format!("- **Result**: {}\n", verdict));
    md.push_str(&format!("- **Sitemap Pages**: {}\n", report.pages));
    md.push_str(&format!("- **URLs Validated**: {}\n", report.validated()));
    md.push_str(&format!("- **Passed**: {}\n", report.passed));
    md.push_str(&format!("- **Failed**: {}\n", report.errors.len()));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", success_rate(report)));

    if report.errors.is_empty() {
        md.push_str("No broken links found.\n");
        return md;
    }

    md.push_str("## Broken Links\n\n");
    md.push_str("| URL | Found On | Status | Reason |\n");
    md.push_str("|-----|----------|--------|--------|\n");

    let mut errors: Vec<_> = report.errors.iter().collect();
    errors.sort();

    for error in errors {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&error.url),
            escape_cell(&error.page),
            error.display_status(),
            escape_cell(error.reason.as_deref().unwrap_or(""))
        ));
    }

    md
}

fn success_rate(report: &RunReport) -> f64 {
    let validated = report.validated();
    if validated == 0 {
        100.0
    } else {
        report.passed as f64 / validated as f64 * 100.0
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
