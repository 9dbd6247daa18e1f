//! Error types for the devreport scanner

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scanner operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur during scanning
#[derive(Error, Debug)]
pub enum ScanError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The code root could not be listed
    #[error("Unable to read the code root {path:?}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The single-module argument is not of the form `Vendor_Module`
    #[error("The module name pattern is invalid: {0:?} (expected Vendor_Module)")]
    InvalidPattern(String),

    /// The named module directory does not exist
    #[error("The module directory doesn't exist: {0}")]
    ModuleNotFound(String),

    /// A configuration file does not have the expected structure
    #[error("Malformed configuration {path:?}: {message}")]
    MalformedConfiguration { path: PathBuf, message: String },

    /// Failed to parse JSON
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid scanner configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    /// Build a `MalformedConfiguration` error for `path`
    pub fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedConfiguration {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
