//! Output formatter trait

use colloquy_application::BookReport;

/// Trait for formatting the final book report
pub trait OutputFormatter {
    /// Human-readable summary
    fn format(&self, report: &BookReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &BookReport) -> String;
}
