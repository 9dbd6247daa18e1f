//! Class resolvability checks
//!
//! Customizer classes are resolved against the PHP source tree through
//! PSR-4 style namespace mappings. Only existence is verified; whether the
//! class honours the right contract is out of scope.

use crate::config::ScanConfig;
use crate::error::ScanResult;
use crate::parser::composer::{parse_installed, parse_psr4, Psr4Mapping};
use crate::source::read_if_exists;
use crate::types::{Diagnostic, ModuleId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of looking a type up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeResolution {
    /// The type is declared where the autoloader would find it
    Exists,
    /// A source file was found but it could not be read or does not
    /// declare the type
    IntrospectionFailed,
    /// No source file for the type
    NotFound,
}

/// Capability to resolve a fully-qualified type name
pub trait TypeResolver {
    fn resolve_type(&self, name: &str) -> TypeResolution;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> TypeResolution,
{
    fn resolve_type(&self, name: &str) -> TypeResolution {
        self(name)
    }
}

/// Resolves classes through namespace prefix to directory mappings
#[derive(Debug, Clone, Default)]
pub struct Psr4Resolver {
    mappings: Vec<Psr4Mapping>,
    code_root: Option<PathBuf>,
}

impl Psr4Resolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `Vendor\Module\Rest` to `<root>/Vendor/Module/Rest.php`
    #[must_use]
    pub fn with_code_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.code_root = Some(root.into());
        self
    }

    /// Add a namespace prefix mapping
    #[must_use]
    pub fn with_mapping(mut self, prefix: &str, dir: impl Into<PathBuf>) -> Self {
        self.add_mapping(Psr4Mapping {
            prefix: prefix.trim_matches('\\').to_string(),
            dir: dir.into(),
        });
        self
    }

    fn add_mapping(&mut self, mapping: Psr4Mapping) {
        self.mappings.push(mapping);
        // Longest prefix first, stable for equal lengths
        self.mappings
            .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
    }

    /// Add the `autoload.psr-4` mappings of a composer.json file
    ///
    /// A missing file is ignored; an unparsable one is logged and ignored.
    pub fn load_composer(&mut self, path: &Path) {
        self.load_mappings(path, parse_psr4);
    }

    /// Add the mappings of every package in a vendor/composer/installed.json
    ///
    /// A missing file is ignored; an unparsable one is logged and ignored.
    pub fn load_installed(&mut self, path: &Path) {
        self.load_mappings(path, parse_installed);
    }

    fn load_mappings(&mut self, path: &Path, parse: fn(&Path, &str) -> ScanResult<Vec<Psr4Mapping>>) {
        let content = match read_if_exists(path) {
            Ok(Some(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to read {path:?}: {e}");
                return;
            }
        };
        match parse(path, &content) {
            Ok(mappings) => {
                debug!(count = mappings.len(), "loaded autoload mappings from {path:?}");
                for mapping in mappings {
                    self.add_mapping(mapping);
                }
            }
            Err(e) => warn!("Ignoring autoload section of {path:?}: {e}"),
        }
    }

    /// Build the resolver for a run over `modules`
    ///
    /// Installed packages are read from `vendor/composer/installed.json`
    /// next to the project composer.json.
    #[must_use]
    pub fn from_config(config: &ScanConfig, modules: &[ModuleId]) -> Self {
        let mut resolver = Self::new().with_code_root(&config.code_root);
        for (prefix, dir) in &config.autoload {
            resolver = resolver.with_mapping(prefix, dir);
        }
        if let Some(composer) = &config.composer_json {
            resolver.load_composer(composer);
            let project_dir = composer.parent().unwrap_or_else(|| Path::new("."));
            resolver.load_installed(&project_dir.join("vendor").join("composer").join("installed.json"));
        }
        for module in modules {
            resolver.load_composer(&module.dir(&config.code_root).join("composer.json"));
        }
        debug!(mappings = resolver.mappings.len(), "class resolver ready");
        resolver
    }

    /// Candidate source files for a class, most specific first
    fn candidates(&self, class: &str) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for mapping in &self.mappings {
            let rest = if mapping.prefix.is_empty() {
                Some(class)
            } else {
                class
                    .strip_prefix(mapping.prefix.as_str())
                    .and_then(|r| r.strip_prefix('\\'))
            };
            if let Some(rest) = rest {
                paths.push(class_file(&mapping.dir, rest));
            }
        }
        if let Some(root) = &self.code_root {
            if class.split('\\').count() >= 3 {
                paths.push(class_file(root, class));
            }
        }
        paths
    }

    fn resolve_declared(&self, class: &str) -> TypeResolution {
        let short_name = class.rsplit('\\').next().unwrap_or(class);
        let mut result = TypeResolution::NotFound;
        for path in self.candidates(class) {
            if !path.is_file() {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(source) if declares_type(&source, short_name) => return TypeResolution::Exists,
                Ok(_) => result = TypeResolution::IntrospectionFailed,
                Err(e) => {
                    debug!("Failed to read {path:?}: {e}");
                    result = TypeResolution::IntrospectionFailed;
                }
            }
        }
        result
    }
}

impl TypeResolver for Psr4Resolver {
    fn resolve_type(&self, name: &str) -> TypeResolution {
        let class = name.trim().trim_start_matches('\\');
        if class.is_empty() {
            return TypeResolution::NotFound;
        }

        let resolution = self.resolve_declared(class);
        if resolution != TypeResolution::NotFound {
            return resolution;
        }

        // Factories, proxies and interceptors are generated from their base class
        match generated_base(class) {
            Some(base) => self.resolve_type(base),
            None => resolution,
        }
    }
}

fn class_file(dir: &Path, relative_class: &str) -> PathBuf {
    let mut path = dir.to_path_buf();
    for segment in relative_class.split('\\').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.set_extension("php");
    path
}

/// Base class of a generated companion class
fn generated_base(class: &str) -> Option<&str> {
    if let Some(base) = class
        .strip_suffix("\\Proxy")
        .or_else(|| class.strip_suffix("\\Interceptor"))
    {
        return Some(base);
    }
    class
        .strip_suffix("Factory")
        .filter(|base| !base.is_empty() && !base.ends_with('\\'))
}

/// Whether `source` declares a class, interface, trait or enum named `short_name`
fn declares_type(source: &str, short_name: &str) -> bool {
    let tokens: Vec<&str> = source
        .split(|c: char| c.is_whitespace() || c == '{' || c == ';')
        .filter(|t| !t.is_empty())
        .collect();
    tokens.windows(2).any(|pair| {
        matches!(
            pair[0].to_ascii_lowercase().as_str(),
            "class" | "interface" | "trait" | "enum"
        ) && pair[1].eq_ignore_ascii_case(short_name)
    })
}

/// Emits a diagnostic for every customizer that does not resolve
pub struct ClassResolvabilityChecker {
    resolver: Box<dyn TypeResolver>,
    cache: HashMap<String, TypeResolution>,
}

impl ClassResolvabilityChecker {
    pub fn new(resolver: impl TypeResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            cache: HashMap::new(),
        }
    }

    /// Check one fully-qualified class name
    ///
    /// Lookups are memoised; the diagnostic is produced on every call.
    pub fn check(&mut self, class: &str) -> Option<Diagnostic> {
        let resolution = match self.cache.get(class) {
            Some(resolution) => *resolution,
            None => {
                let resolution = self.resolver.resolve_type(class);
                self.cache.insert(class.to_string(), resolution);
                resolution
            }
        };

        match resolution {
            TypeResolution::Exists => None,
            TypeResolution::NotFound => Some(Diagnostic::error(format!("class not found: `{class}`"))),
            TypeResolution::IntrospectionFailed => Some(Diagnostic::error(format!(
                "unable to inspect class: `{class}`"
            ))),
        }
    }
}

impl std::fmt::Debug for ClassResolvabilityChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassResolvabilityChecker")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}
