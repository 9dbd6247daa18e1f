//! devreport CLI - customization cross-reference reports
//!
//! Provides `devreport observers`, `devreport plugins` and
//! `devreport preferences`.

mod commands;

use clap::{Args, Parser, Subcommand};
use devreport_scanner::ReportKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::report::{FormatArg, ReportOptions};

#[derive(Parser)]
#[command(name = "devreport")]
#[command(about = "devreport - observers, plugins and preferences cross-reference")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOptions {
    /// Directory holding Vendor/Module directories [default: app/code]
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Directory where reports are written [default: var]
    #[arg(short, long, global = true, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, global = true, value_enum, default_value = "html")]
    format: FormatArg,

    /// Vendor to skip (repeatable, replaces the default list)
    #[arg(long = "exclude-vendor", global = true, value_name = "NAME")]
    exclude_vendors: Vec<String>,

    /// Config file [default: ./devreport.json if present]
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which observers listen to which events
    Observers {
        /// Only scan this module (Vendor_Module)
        #[arg(value_name = "MODULE")]
        module: Option<String>,
    },
    /// Report which plugins intercept which types
    Plugins {
        /// Only scan this module (Vendor_Module)
        #[arg(value_name = "MODULE")]
        module: Option<String>,
    },
    /// Report which classes are replaced by preferences
    Preferences {
        /// Only scan this module (Vendor_Module)
        #[arg(value_name = "MODULE")]
        module: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.options.verbose);

    let (kind, module) = match cli.command {
        Commands::Observers { module } => (ReportKind::Observer, module),
        Commands::Plugins { module } => (ReportKind::Plugin, module),
        Commands::Preferences { module } => (ReportKind::Preference, module),
    };

    let options = ReportOptions {
        root: cli.options.root,
        output: cli.options.output,
        format: cli.options.format,
        exclude_vendors: cli.options.exclude_vendors,
        config: cli.options.config,
    };

    if let Err(e) = commands::report::execute(kind, module.as_deref(), options) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
