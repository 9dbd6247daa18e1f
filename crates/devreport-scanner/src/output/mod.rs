//! Output formatters for reports

pub mod html;
pub mod json;
pub mod markdown;

pub use html::to_html;
pub use json::to_json;
pub use markdown::to_markdown;

use crate::error::ScanResult;
use crate::report::Report;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Document format of a written report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Markdown,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Html, OutputFormat::Markdown, OutputFormat::Json];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }

    /// Render `report` in this format
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails
    pub fn render(self, report: &Report) -> ScanResult<String> {
        match self {
            OutputFormat::Html => Ok(to_html(report)),
            OutputFormat::Markdown => Ok(to_markdown(report)),
            OutputFormat::Json => to_json(report),
        }
    }
}

/// File name of a report, `<Prefix>-<YYYY-MM-DD_HH-MM-SS>.<ext>`
#[must_use]
pub fn report_file_name(report: &Report, format: OutputFormat) -> String {
    format!(
        "{}-{}.{}",
        report.kind.file_prefix(),
        report.generated_at.format("%Y-%m-%d_%H-%M-%S"),
        format.extension()
    )
}

/// Render `report` in `format` and write it into `output_dir`
///
/// The directory is created if missing. Returns the written path.
///
/// # Errors
/// Returns an error if rendering or writing fails
pub fn write_report(report: &Report, output_dir: &Path, format: OutputFormat) -> ScanResult<PathBuf> {
    let content = format.render(report)?;
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_file_name(report, format));
    fs::write(&path, content)?;
    info!("Wrote {format:?} report to {path:?}");
    Ok(path)
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_file_name() {
        let report = fixtures::sample_report();
        assert_eq!(
            report_file_name(&report, OutputFormat::Html),
            "Preferences-2024-03-09_14-05-07.html"
        );
        assert_eq!(
            report_file_name(&report, OutputFormat::Markdown),
            "Preferences-2024-03-09_14-05-07.md"
        );
    }

    #[test]
    fn test_write_report_creates_directory() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("var").join("reports");
        let report = fixtures::sample_report();

        let path = write_report(&report, &out, OutputFormat::Json).unwrap();
        assert!(path.starts_with(&out));
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("\"Acme_Foo\""));
    }
}
