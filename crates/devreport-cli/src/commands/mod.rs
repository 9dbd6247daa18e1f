//! CLI command handlers
//!
//! The three report subcommands share one handler, parameterised by
//! report kind.

pub mod report;
