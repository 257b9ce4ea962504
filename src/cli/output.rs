//! Output formatting for CLI

use crate::engine::ValidationReport;
use crate::report::ValidationResult;

use super::error::CliError;

/// Render the wire JSON of a result
pub fn render_result(result: &ValidationResult, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        result.to_json_pretty()?
    } else {
        result.to_json()?
    };
    Ok(json)
}

/// One-paragraph human summary of a run, for stderr
pub fn format_summary(report: &ValidationReport) -> String {
    let stats = &report.stats;
    let mut output = format!(
        "Validation {}: {} error(s) in {} row(s), {} bytes read in {}ms",
        report.result.status(),
        stats.errors_reported,
        stats.rows_validated,
        stats.bytes_read,
        stats.duration_ms
    );

    if stats.termination.is_partial() {
        output.push_str(&format!(
            "\nStopped early ({}); results are partial",
            stats.termination.as_str()
        ));
    }
    if stats.errors_dropped > 0 {
        output.push_str(&format!(
            "\n{} further error(s) were not reported",
            stats.errors_dropped
        ));
    }

    output
}
