//! Scanner configuration
//!
//! A run is configured from, in order of precedence, CLI flags, an optional
//! `devreport.json` file, and the defaults below:
//! - `code_root`: `app/code`
//! - `excluded_vendors`: `["Magento"]`
//! - `output_dir`: `var`
//! - `composer_json`: `composer.json` in the project directory, when present
//! - `autoload`: no extra namespace mappings

use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the config file picked up from the working directory
pub const CONFIG_FILE_NAME: &str = "devreport.json";

/// Project composer file picked up when none is configured
pub const COMPOSER_FILE_NAME: &str = "composer.json";

/// Vendor whose modules are never scanned unless overridden
pub const DEFAULT_EXCLUDED_VENDOR: &str = "Magento";

/// Effective configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory holding `Vendor/Module` directories
    pub code_root: PathBuf,
    /// Vendor directories that are skipped during discovery
    pub excluded_vendors: Vec<String>,
    /// Directory where reports are written
    pub output_dir: PathBuf,
    /// Project `composer.json` whose PSR-4 mappings help resolve classes
    pub composer_json: Option<PathBuf>,
    /// Extra namespace prefix to directory mappings
    pub autoload: BTreeMap<String, PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            code_root: PathBuf::from("app/code"),
            excluded_vendors: vec![DEFAULT_EXCLUDED_VENDOR.to_string()],
            output_dir: PathBuf::from("var"),
            composer_json: None,
            autoload: BTreeMap::new(),
        }
    }
}

/// On-disk shape of `devreport.json`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    code_root: Option<PathBuf>,
    excluded_vendors: Option<Vec<String>>,
    output_dir: Option<PathBuf>,
    composer_json: Option<PathBuf>,
    #[serde(default)]
    autoload: BTreeMap<String, PathBuf>,
}

impl ScanConfig {
    /// Load a config file and layer it over the defaults
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load(path: &Path) -> ScanResult<Self> {
        let content = fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&content, base)
    }

    /// Parse config JSON, resolving relative paths against `base`
    pub fn from_json(content: &str, base: &Path) -> ScanResult<Self> {
        let raw: RawConfig = serde_json::from_str(content)?;
        let defaults = Self::default();

        let config = Self {
            code_root: raw
                .code_root
                .map_or(defaults.code_root, |p| base.join(p)),
            excluded_vendors: raw.excluded_vendors.unwrap_or(defaults.excluded_vendors),
            output_dir: raw
                .output_dir
                .map_or(defaults.output_dir, |p| base.join(p)),
            composer_json: raw.composer_json.map(|p| base.join(p)),
            autoload: raw
                .autoload
                .into_iter()
                .map(|(prefix, dir)| (prefix, base.join(dir)))
                .collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Find `devreport.json` in `dir`, if present
    #[must_use]
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Use `<project_dir>/composer.json` when no composer file is configured
    /// and that file exists
    pub fn detect_composer_json(&mut self, project_dir: &Path) {
        if self.composer_json.is_some() {
            return;
        }
        let candidate = project_dir.join(COMPOSER_FILE_NAME);
        if candidate.is_file() {
            self.composer_json = Some(candidate);
        }
    }

    /// Check the configuration for unusable values
    pub fn validate(&self) -> ScanResult<()> {
        if self.code_root.as_os_str().is_empty() {
            return Err(ScanError::Config("code root cannot be empty".into()));
        }
        if let Some(bad) = self
            .excluded_vendors
            .iter()
            .find(|v| v.trim().is_empty() || v.contains(['/', '\\']))
        {
            return Err(ScanError::Config(format!(
                "invalid excluded vendor name: {bad:?}"
            )));
        }
        if let Some(prefix) = self.autoload.keys().find(|p| p.trim_matches('\\').is_empty()) {
            return Err(ScanError::Config(format!(
                "invalid autoload namespace prefix: {prefix:?}"
            )));
        }
        Ok(())
    }
}
