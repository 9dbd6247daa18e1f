//! Report commands
//!
//! Handles: devreport observers/plugins/preferences [MODULE]

use anyhow::{Context, Result};
use clap::ValueEnum;
use devreport_scanner::output::{write_report, OutputFormat};
use devreport_scanner::{ModuleSelection, ReportKind, ScanConfig, Scanner};
use std::path::PathBuf;
use tracing::{debug, info};

/// Formats accepted by `--format`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Html,
    Markdown,
    Json,
    /// Every format
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<OutputFormat> {
        match self {
            FormatArg::Html => vec![OutputFormat::Html],
            FormatArg::Markdown => vec![OutputFormat::Markdown],
            FormatArg::Json => vec![OutputFormat::Json],
            FormatArg::All => OutputFormat::ALL.to_vec(),
        }
    }
}

/// Options shared by every report subcommand
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: FormatArg,
    pub exclude_vendors: Vec<String>,
    pub config: Option<PathBuf>,
}

/// Layer CLI flags over the config file over the defaults
fn resolve_config(options: &ReportOptions) -> Result<ScanConfig> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let file = match &options.config {
        Some(path) => Some(path.clone()),
        None => ScanConfig::discover(&cwd),
    };

    let mut config = match file {
        Some(path) => {
            debug!("Loading config from {path:?}");
            ScanConfig::load(&path).with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => ScanConfig::default(),
    };

    if let Some(root) = &options.root {
        config.code_root.clone_from(root);
    }
    if let Some(output) = &options.output {
        config.output_dir.clone_from(output);
    }
    if !options.exclude_vendors.is_empty() {
        config.excluded_vendors.clone_from(&options.exclude_vendors);
    }
    config.detect_composer_json(&cwd);
    config.validate()?;
    Ok(config)
}

/// Run one report and write it in every requested format
pub fn execute(kind: ReportKind, module: Option<&str>, options: ReportOptions) -> Result<()> {
    let config = resolve_config(&options)?;
    info!(?config, "effective configuration");
    let output_dir = config.output_dir.clone();
    let selection = ModuleSelection::from_arg(module);

    println!("Scanning modules...");
    let scanner = Scanner::new(config);
    let report = scanner.scan(kind, &selection)?;

    println!("Generating report...");
    for format in options.format.formats() {
        let path = write_report(&report, &output_dir, format)
            .with_context(|| format!("Failed to write report to {}", output_dir.display()))?;
        println!("Report successfully generated: {}", path.display());
    }

    let summary = report.summary;
    println!("\n{} complete!", report.title);
    println!("  Modules with declarations: {}", summary.modules);
    println!("  Declarations: {}", summary.declarations);
    println!("  {}: {}", kind.target_title(), summary.targets);
    if report.is_clean() {
        println!("  No error detected");
    } else {
        println!(
            "  Diagnostics: {} errors, {} warnings, {} info",
            summary.errors, summary.warnings, summary.infos
        );
    }

    Ok(())
}
