//! JSON output formatter

use crate::error::ScanResult;
use crate::report::Report;

/// Convert a report to a JSON string
///
/// # Errors
/// Returns an error if serialization fails
pub fn to_json(report: &Report) -> ScanResult<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
