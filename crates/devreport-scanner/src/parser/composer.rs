//! composer.json and vendor/composer/installed.json autoload parsers

use crate::error::{ScanError, ScanResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Raw composer.json structure for parsing
#[derive(Debug, Deserialize)]
struct RawComposer {
    #[serde(default)]
    autoload: RawAutoload,
}

#[derive(Debug, Default, Deserialize)]
struct RawAutoload {
    #[serde(rename = "psr-4", default)]
    psr4: BTreeMap<String, RawPaths>,
}

/// vendor/composer/installed.json: an object with a `packages` list since
/// Composer 2, a bare list before
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInstalled {
    Packages { packages: Vec<RawPackage> },
    List(Vec<RawPackage>),
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: Option<String>,
    #[serde(rename = "install-path")]
    install_path: Option<String>,
    #[serde(default)]
    autoload: RawAutoload,
}

/// A PSR-4 prefix maps to one directory or to a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPaths {
    One(String),
    Many(Vec<String>),
}

/// A namespace prefix and the directory its classes live in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Psr4Mapping {
    /// Namespace prefix without leading or trailing backslashes
    pub prefix: String,
    /// Base directory, resolved against the composer.json location
    pub dir: PathBuf,
}

/// Parse the `autoload.psr-4` section of a composer.json file
///
/// # Errors
/// Returns an error if the content is not valid JSON
pub fn parse_psr4(path: &Path, content: &str) -> ScanResult<Vec<Psr4Mapping>> {
    let raw: RawComposer = serde_json::from_str(content).map_err(ScanError::JsonParse)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut mappings = Vec::new();
    push_psr4(&mut mappings, base, raw.autoload);
    Ok(mappings)
}

/// Parse the PSR-4 mappings of every package listed in an installed.json
///
/// Package directories come from `install-path`, relative to the directory
/// holding installed.json. Older files lack it; the package then lives in
/// `vendor/<name>`.
///
/// # Errors
/// Returns an error if the content is not valid JSON
pub fn parse_installed(path: &Path, content: &str) -> ScanResult<Vec<Psr4Mapping>> {
    let raw: RawInstalled = serde_json::from_str(content).map_err(ScanError::JsonParse)?;
    let packages = match raw {
        RawInstalled::Packages { packages } | RawInstalled::List(packages) => packages,
    };
    let composer_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let vendor_dir = composer_dir.parent().unwrap_or(composer_dir);

    let mut mappings = Vec::new();
    for package in packages {
        let base = match (&package.install_path, &package.name) {
            (Some(install_path), _) => composer_dir.join(install_path),
            (None, Some(name)) => vendor_dir.join(name),
            (None, None) => continue,
        };
        push_psr4(&mut mappings, &base, package.autoload);
    }
    Ok(mappings)
}

fn push_psr4(mappings: &mut Vec<Psr4Mapping>, base: &Path, autoload: RawAutoload) {
    for (prefix, paths) in autoload.psr4 {
        let dirs = match paths {
            RawPaths::One(dir) => vec![dir],
            RawPaths::Many(dirs) => dirs,
        };
        let prefix = prefix.trim_matches('\\').to_string();
        for dir in dirs {
            mappings.push(Psr4Mapping {
                prefix: prefix.clone(),
                dir: base.join(dir),
            });
        }
    }
}
