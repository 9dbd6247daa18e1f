//! Devreport Scanner - customization-point cross-reference engine
//!
//! This crate walks a tree of `Vendor/Module` directories, collects the
//! observers, plugins and preferences each module declares in its
//! global, adminhtml and frontend configuration files, and indexes them
//! both by declaring module and by customized target.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::items_after_statements,
    clippy::single_match_else,
    clippy::match_same_arms,
    clippy::unnecessary_debug_formatting,
    clippy::option_if_let_else,
    clippy::needless_pass_by_value,
    clippy::map_unwrap_or,
    clippy::manual_let_else
)]

pub mod aggregate;
pub mod config;
pub mod declaration;
pub mod discovery;
pub mod error;
pub mod output;
pub mod parser;
pub mod report;
pub mod resolver;
pub mod scan;
pub mod source;
pub mod types;

pub use aggregate::{Aggregator, CrossReference};
pub use config::ScanConfig;
pub use error::{ScanError, ScanResult};
pub use report::Report;
pub use scan::{ModuleSelection, Scanner};
pub use types::{Diagnostic, ModuleId, ReportKind, Scope, Severity};
