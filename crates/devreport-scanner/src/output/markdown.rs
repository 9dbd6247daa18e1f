//! Markdown output formatter

use crate::report::Report;
use std::fmt::Write;

/// Convert a report to Markdown
#[must_use]
pub fn to_markdown(report: &Report) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}\n", report.title);
    let _ = writeln!(
        output,
        "**Generated at:** {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    // Summary
    output.push_str("## Summary\n\n");
    let _ = writeln!(output, "- **Modules:** {}", report.summary.modules);
    let _ = writeln!(output, "- **Declarations:** {}", report.summary.declarations);
    let _ = writeln!(output, "- **Targets:** {}", report.summary.targets);
    let _ = writeln!(
        output,
        "- **Diagnostics:** {} errors, {} warnings\n",
        report.summary.errors, report.summary.warnings
    );

    // Modules
    output.push_str("## Modules\n\n");
    if report.modules.is_empty() {
        output.push_str("_No declarations found_\n\n");
    }
    for section in &report.modules {
        let _ = writeln!(output, "### {} ({})\n", code(&section.module), section.total);
        let _ = writeln!(output, "| {} | Scope | Class |", report.key_label);
        output.push_str("|---|---|---|\n");
        for row in &section.rows {
            let _ = writeln!(
                output,
                "| {} | {} | {} |",
                code(&row.key),
                row.scope,
                code(&row.customizer)
            );
        }
        output.push('\n');
    }

    // Targets
    let _ = writeln!(output, "## {}\n", report.target_title);
    for section in &report.targets {
        match section.override_count {
            Some(count) => {
                let _ = writeln!(output, "### {} ({count})\n", code(&section.target));
            }
            None => {
                let _ = writeln!(output, "### {}\n", code(&section.target));
            }
        }
        output.push_str("| Module | Scope | Class |\n");
        output.push_str("|---|---|---|\n");
        for row in &section.rows {
            let _ = writeln!(
                output,
                "| {} | {} | {} |",
                code(&row.module),
                row.scope,
                code(&row.customizer)
            );
        }
        output.push('\n');
    }

    // Diagnostics
    output.push_str("## Diagnostics\n\n");
    if report.is_clean() {
        output.push_str("_No error detected_\n\n");
    } else {
        for diagnostic in &report.diagnostics {
            let _ = writeln!(output, "- **{}:** {}", diagnostic.severity, diagnostic.message);
        }
        output.push('\n');
    }

    output
}

/// Inline code span, safe inside a table cell
fn code(text: &str) -> String {
    format!("`{}`", text.replace('|', "\\|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_report;

    #[test]
    fn test_to_markdown_sections() {
        let md = to_markdown(&sample_report());
        assert!(md.starts_with("# Preferences report\n"));
        assert!(md.contains("**Generated at:** 2024-03-09 14:05:07 UTC"));
        assert!(md.contains("### `Acme_Foo` (1)"));
        assert!(md.contains("| Overridden class | Scope | Class |"));
        assert!(md.contains("## Target class"));
        assert!(md.contains("### `Magento\\Catalog\\Model\\Product` (2)"));
        assert!(md.contains("| `Beta_Bar` | adminhtml | `Beta\\Bar\\Model\\Product<T>` |"));
        assert!(md.contains("- **warning:** class overridden more than once"));
        assert!(md.find("## Target class").unwrap() < md.find("## Diagnostics").unwrap());
    }

    #[test]
    fn test_clean_report() {
        let mut report = sample_report();
        report.diagnostics.clear();
        let md = to_markdown(&report);
        assert!(md.contains("_No error detected_"));
    }

    #[test]
    fn test_module_names_are_escaped() {
        let mut report = sample_report();
        report.modules[0].module = "Acme_Foo|Bar".to_string();
        report.targets[0].rows[1].module = "Beta_Bar|Baz".to_string();
        let md = to_markdown(&report);
        assert!(md.contains("### `Acme_Foo\\|Bar` (1)"));
        assert!(md.contains("| `Beta_Bar\\|Baz` | adminhtml |"));
        assert!(!md.contains("Bar|Baz"));
    }

    #[test]
    fn test_code_escapes_pipes() {
        assert_eq!(code("a|b"), "`a\\|b`");
    }
}
