//! Main scanner implementation

use crate::aggregate::Aggregator;
use crate::config::ScanConfig;
use crate::discovery::ModuleDiscovery;
use crate::error::ScanResult;
use crate::report::{Report, ReportAssembler};
use crate::resolver::{ClassResolvabilityChecker, Psr4Resolver, TypeResolution, TypeResolver};
use crate::source::DeclarationSource;
use crate::types::{ModuleId, ReportKind};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Which modules a run covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleSelection {
    /// Every module of every non-excluded vendor
    All,
    /// One module named `Vendor_Module`
    Single(String),
}

impl ModuleSelection {
    /// `Single` when an argument was given, `All` otherwise
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(pattern) => ModuleSelection::Single(pattern.to_string()),
            None => ModuleSelection::All,
        }
    }
}

/// The main scanner struct
///
/// A scanner holds configuration only. Every call to [`Scanner::scan`]
/// builds its own aggregator, so runs never share index state.
pub struct Scanner {
    config: ScanConfig,
    resolver: Option<Arc<dyn TypeResolver + Send + Sync>>,
}

impl Scanner {
    /// Create a new scanner
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            resolver: None,
        }
    }

    /// Resolve customizer classes with `resolver` instead of the PSR-4
    /// lookup built from the configuration
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl TypeResolver + Send + Sync + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Perform one full run and assemble its report
    ///
    /// # Errors
    /// Returns an error if the code root cannot be listed, or if a single
    /// module was requested and its name is malformed or its directory is
    /// absent. Problems with individual configuration files are reported
    /// as diagnostics instead.
    pub fn scan(&self, kind: ReportKind, selection: &ModuleSelection) -> ScanResult<Report> {
        let modules = self.select_modules(selection)?;
        info!(kind = %kind, count = modules.len(), "scanning modules");

        let source = DeclarationSource::new(kind);
        let mut aggregator = Aggregator::new(kind);
        let mut diagnostics = Vec::new();
        let mut files_scanned = Vec::new();

        for module in &modules {
            let extraction = source.extract(module, &module.dir(&self.config.code_root));
            diagnostics.extend(extraction.diagnostics);
            files_scanned.extend(extraction.declarations.files().iter().cloned());
            if !aggregator.ingest(module.clone(), extraction.declarations) {
                debug!(module = %module, "module has no {kind} declarations");
            }
        }

        let xref = aggregator.finalize();
        info!(
            modules = xref.module_count(),
            declarations = xref.declaration_count(),
            targets = xref.reverse.len(),
            "indexes built"
        );

        let checker = self.checker(&modules);
        let report = ReportAssembler::new(checker).assemble(xref, diagnostics, files_scanned, Utc::now());
        info!(
            errors = report.summary.errors,
            warnings = report.summary.warnings,
            "report assembled"
        );
        Ok(report)
    }

    fn select_modules(&self, selection: &ModuleSelection) -> ScanResult<Vec<ModuleId>> {
        let discovery = ModuleDiscovery::from_config(&self.config);
        match selection {
            ModuleSelection::All => discovery.discover(),
            ModuleSelection::Single(pattern) => Ok(vec![discovery.resolve_single(pattern)?]),
        }
    }

    fn checker(&self, modules: &[ModuleId]) -> ClassResolvabilityChecker {
        match &self.resolver {
            Some(resolver) => {
                let resolver = Arc::clone(resolver);
                ClassResolvabilityChecker::new(move |name: &str| -> TypeResolution {
                    resolver.resolve_type(name)
                })
            }
            None => ClassResolvabilityChecker::new(Psr4Resolver::from_config(&self.config, modules)),
        }
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("custom_resolver", &self.resolver.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scanner(root: &std::path::Path) -> Scanner {
        let config = ScanConfig {
            code_root: root.to_path_buf(),
            ..ScanConfig::default()
        };
        Scanner::new(config).with_resolver(|_: &str| TypeResolution::Exists)
    }

    #[test]
    fn test_module_selection_from_arg() {
        assert_eq!(ModuleSelection::from_arg(None), ModuleSelection::All);
        assert_eq!(
            ModuleSelection::from_arg(Some("Acme_Foo")),
            ModuleSelection::Single("Acme_Foo".into())
        );
    }

    #[test]
    fn test_scan_excludes_vendor_and_records_files() {
        let temp = TempDir::new().unwrap();
        let events = r#"<config><event name="e"><observer name="o" instance="Acme\Foo\O"/></event></config>"#;
        write(temp.path(), "Acme/Foo/etc/events.xml", events);
        write(temp.path(), "Magento/Catalog/etc/events.xml", events);

        let report = scanner(temp.path())
            .scan(ReportKind::Observer, &ModuleSelection::All)
            .unwrap();
        assert_eq!(report.modules.len(), 1);
        assert_eq!(report.modules[0].module, "Acme_Foo");
        assert_eq!(report.files_scanned.len(), 1);
        assert_eq!(report.files_scanned[0].sha256.len(), 64);
    }

    #[test]
    fn test_single_module_not_found_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = scanner(temp.path())
            .scan(ReportKind::Plugin, &ModuleSelection::Single("Acme_Missing".into()))
            .unwrap_err();
        assert!(matches!(err, ScanError::ModuleNotFound(_)));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = scanner(&temp.path().join("nope"))
            .scan(ReportKind::Plugin, &ModuleSelection::All)
            .unwrap_err();
        assert!(matches!(err, ScanError::RootUnreadable { .. }));
    }
}
