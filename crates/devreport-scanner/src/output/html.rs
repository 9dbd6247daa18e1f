//! HTML output formatter
//!
//! Produces a single self-contained page: a title table per module or
//! target, each followed by a three-column block, then a closing check
//! block listing the diagnostics.

use crate::report::Report;
use crate::types::Severity;
use std::fmt::Write;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; width: 100%; margin-bottom: 0.5em; }
td, th { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }
.moduleTitle { background: #2f4f6f; color: #fff; font-size: 1.1em; }
.columnHeadTitle { background: #dde6ee; }
#leftColum { width: 40%; }
#middleColum { width: 15%; }
#rightColum { width: 45%; }
.infoMsg { color: #1d5d1d; }
.warningMsg { color: #9a6a00; }
.errorMsg { color: #a01010; font-weight: bold; }
";

/// Convert a report to an HTML page
#[must_use]
pub fn to_html(report: &Report) -> String {
    let mut out = String::new();
    let title = escape(&report.title);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{title}</title>");
    let _ = writeln!(out, "<style>\n{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(out, "<h1>{title}</h1>");
    let _ = writeln!(
        out,
        "<p>Generated at {}</p>",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    out.push_str("<h2>Modules</h2>\n");
    for section in &report.modules {
        title_table(&mut out, &format!("{} ({})", section.module, section.total));
        let lines: Vec<[&str; 3]> = section
            .rows
            .iter()
            .map(|row| [row.key.as_str(), row.scope.as_str(), row.customizer.as_str()])
            .collect();
        block(&mut out, [report.key_label.as_str(), "Scope", "Class"], &lines);
    }

    let _ = writeln!(out, "<h2>{}</h2>", escape(&report.target_title));
    for section in &report.targets {
        let heading = match section.override_count {
            Some(count) => format!("{} ({count})", section.target),
            None => section.target.clone(),
        };
        title_table(&mut out, &heading);
        let lines: Vec<[&str; 3]> = section
            .rows
            .iter()
            .map(|row| [row.module.as_str(), row.scope.as_str(), row.customizer.as_str()])
            .collect();
        block(&mut out, ["Module", "Scope", "Class"], &lines);
    }

    out.push_str("<h2>Report check</h2>\n<table>\n");
    out.push_str(&check_block(report));
    out.push_str("</table>\n");

    out.push_str("</body>\n</html>\n");
    out
}

/// One row per diagnostic, or a single info row when there are none
fn check_block(report: &Report) -> String {
    if report.is_clean() {
        return msg_line("No error detected", "infoMsg");
    }
    report
        .diagnostics
        .iter()
        .map(|diagnostic| {
            let class = match diagnostic.severity {
                Severity::Info => "infoMsg",
                Severity::Warning => "warningMsg",
                Severity::Error => "errorMsg",
            };
            msg_line(&diagnostic.message, class)
        })
        .collect()
}

fn msg_line(message: &str, class: &str) -> String {
    format!("<tr><td class=\"{class}\">{}</td></tr>\n", escape(message))
}

fn title_table(out: &mut String, title: &str) {
    let _ = writeln!(
        out,
        "<table><tr><th class=\"moduleTitle\">{}</th></tr></table>",
        escape(title)
    );
}

fn block(out: &mut String, headers: [&str; 3], lines: &[[&str; 3]]) {
    out.push_str("<table>\n<tr>");
    for (header, id) in headers.iter().zip(["leftColum", "middleColum", "rightColum"]) {
        let _ = write!(out, "<th class=\"columnHeadTitle\" id=\"{id}\">{}</th>", escape(header));
    }
    out.push_str("</tr>\n");
    for line in lines {
        out.push_str("<tr>");
        for cell in line {
            let _ = write!(out, "<td>{}</td>", escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

/// Escape text for HTML element content and attribute values
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_report;

    #[test]
    fn test_to_html_structure() {
        let html = to_html(&sample_report());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Preferences report</title>"));
        assert!(html.contains("Generated at 2024-03-09 14:05:07"));
        assert!(html.contains("<th class=\"moduleTitle\">Acme_Foo (1)</th>"));
        assert!(html.contains("<th class=\"moduleTitle\">Magento\\Catalog\\Model\\Product (2)</th>"));
        assert!(html.contains("<h2>Target class</h2>"));
        assert!(html.contains("<td class=\"warningMsg\">class overridden more than once"));
        assert!(html.trim_end().ends_with("</html>"));
        let targets_at = html.find("<h2>Target class</h2>").unwrap();
        assert!(html.find("<h2>Modules</h2>").unwrap() < targets_at);
        assert!(targets_at < html.find("<h2>Report check</h2>").unwrap());
    }

    #[test]
    fn test_to_html_escapes_content() {
        let html = to_html(&sample_report());
        assert!(html.contains("<td>Beta\\Bar\\Model\\Product&lt;T&gt;</td>"));
        assert!(!html.contains("Product<T>"));
    }

    #[test]
    fn test_clean_report_says_no_error() {
        let mut report = sample_report();
        report.diagnostics.clear();
        let html = to_html(&report);
        assert!(html.contains("<td class=\"infoMsg\">No error detected</td>"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a & \"b\""), "a &amp; &quot;b&quot;");
    }
}
