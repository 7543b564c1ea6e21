//! Report rendering.

mod text;

use sonde_domain::RunReport;

use crate::serialization::{SerializationError, to_json_stable};

pub use text::TextReport;

/// Output formats for a run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Indented human-readable text.
    #[default]
    Text,
    /// Stable pretty-printed JSON.
    Json,
}

/// Renders a report in the requested format.
///
/// # Errors
///
/// Returns `SerializationError` if JSON rendering fails.
pub fn render_report(report: &RunReport, format: ReportFormat) -> Result<String, SerializationError> {
    match format {
        ReportFormat::Text => Ok(TextReport::new(report).to_string()),
        ReportFormat::Json => to_json_stable(report),
    }
}
