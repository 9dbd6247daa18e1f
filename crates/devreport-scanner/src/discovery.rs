//! Module discovery
//!
//! Lists `Vendor/Module` directories under the code root. Discovery is a
//! pure listing: modules without declarations are filtered later, when
//! their declaration sets are ingested.

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::types::ModuleId;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Enumerates modules below a code root
#[derive(Debug, Clone)]
pub struct ModuleDiscovery {
    root: PathBuf,
    excluded_vendors: BTreeSet<String>,
}

impl ModuleDiscovery {
    pub fn new<I, S>(root: impl Into<PathBuf>, excluded_vendors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            excluded_vendors: excluded_vendors.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(&config.code_root, config.excluded_vendors.iter().cloned())
    }

    /// List every module of every non-excluded vendor
    ///
    /// Vendors and modules are returned in name order so that repeated
    /// runs over the same tree see the same sequence.
    ///
    /// # Errors
    /// Returns `RootUnreadable` if the code root cannot be listed
    pub fn discover(&self) -> ScanResult<Vec<ModuleId>> {
        let vendors =
            list_subdirectories(&self.root).map_err(|source| ScanError::RootUnreadable {
                path: self.root.clone(),
                source,
            })?;

        let mut modules = Vec::new();
        for vendor in vendors {
            if self.excluded_vendors.contains(&vendor) {
                debug!(vendor = %vendor, "skipping excluded vendor");
                continue;
            }
            let vendor_dir = self.root.join(&vendor);
            match list_subdirectories(&vendor_dir) {
                Ok(names) => {
                    modules.extend(names.into_iter().map(|name| ModuleId::new(&vendor, name)));
                }
                Err(e) => {
                    warn!("Failed to list vendor directory {vendor_dir:?}: {e}");
                }
            }
        }

        debug!(count = modules.len(), "discovered modules");
        Ok(modules)
    }

    /// Resolve a `Vendor_Module` argument to a single module
    ///
    /// # Errors
    /// Returns `InvalidPattern` if the argument does not split into two
    /// non-empty parts, or `ModuleNotFound` if the directory is absent
    pub fn resolve_single(&self, pattern: &str) -> ScanResult<ModuleId> {
        let module = parse_module_pattern(pattern)?;
        if !module.dir(&self.root).is_dir() {
            return Err(ScanError::ModuleNotFound(module.dir(&self.root).display().to_string()));
        }
        Ok(module)
    }
}

/// Split `Vendor_Module` into a `ModuleId`
///
/// # Errors
/// Returns `InvalidPattern` unless there is exactly one `_` separating two
/// parts that are non-empty after trimming
pub fn parse_module_pattern(pattern: &str) -> ScanResult<ModuleId> {
    let parts: Vec<&str> = pattern.split('_').map(str::trim).collect();
    match parts.as_slice() {
        [vendor, name] if !vendor.is_empty() && !name.is_empty() => {
            Ok(ModuleId::new(*vendor, *name))
        }
        _ => Err(ScanError::InvalidPattern(pattern.to_string())),
    }
}

/// Names of the directories directly inside `dir`, sorted
fn list_subdirectories(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name != "." && name != "..")
        .collect();
    names.sort();
    Ok(names)
}
