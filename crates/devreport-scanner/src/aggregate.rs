//! Forward and reverse indexing of declarations
//!
//! The `Aggregator` is built fresh for every run and consumed by
//! `finalize`, so an index can never be folded twice.

use crate::declaration::ModuleDeclarationSet;
use crate::types::{Diagnostic, ModuleId, ReportKind, Scope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A module and the declarations it contributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub module: ModuleId,
    pub declarations: ModuleDeclarationSet,
}

/// One contribution to a customized target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseEntry {
    /// Module declaring the customization
    pub module: ModuleId,
    /// Class implementing it
    pub customizer: String,
}

/// Declarations grouped by target key, then scope
pub type ReverseIndex = BTreeMap<String, BTreeMap<Scope, Vec<ReverseEntry>>>;

/// Number of substitutions naming each target class
pub type OverrideTally = BTreeMap<String, usize>;

/// Accumulates module declaration sets into both indexes
#[derive(Debug)]
pub struct Aggregator {
    kind: ReportKind,
    forward: Vec<ModuleEntry>,
    reverse: ReverseIndex,
    override_tally: OverrideTally,
}

impl Aggregator {
    #[must_use]
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            forward: Vec::new(),
            reverse: ReverseIndex::new(),
            override_tally: OverrideTally::new(),
        }
    }

    /// Add one module's declarations
    ///
    /// Modules without declarations are discarded. Returns whether the
    /// module was kept.
    pub fn ingest(&mut self, module: ModuleId, declarations: ModuleDeclarationSet) -> bool {
        if declarations.is_empty() {
            debug!(module = %module, "no declarations, module dropped");
            return false;
        }

        for declaration in declarations.iter() {
            self.reverse
                .entry(declaration.source_key.clone())
                .or_default()
                .entry(declaration.scope)
                .or_default()
                .push(ReverseEntry {
                    module: module.clone(),
                    customizer: declaration.customizer.clone(),
                });
            if self.kind.tracks_overrides() {
                *self
                    .override_tally
                    .entry(declaration.source_key.clone())
                    .or_default() += 1;
            }
        }

        self.forward.push(ModuleEntry {
            module,
            declarations,
        });
        true
    }

    /// Run anomaly detection and hand over the finished indexes
    #[must_use]
    pub fn finalize(self) -> CrossReference {
        let diagnostics = self
            .override_tally
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(class, count)| {
                Diagnostic::warning(format!(
                    "class overridden more than once: `{class}` ({count} preferences)"
                ))
            })
            .collect();

        CrossReference {
            kind: self.kind,
            forward: self.forward,
            reverse: self.reverse,
            override_tally: self.override_tally,
            diagnostics,
        }
    }
}

/// The finished forward and reverse indexes of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossReference {
    pub kind: ReportKind,
    /// Modules in ingestion order
    pub forward: Vec<ModuleEntry>,
    /// Target key to per-scope contributions, keys in lexicographic order
    pub reverse: ReverseIndex,
    /// Only populated for preference reports
    pub override_tally: OverrideTally,
    /// Anomalies found by `Aggregator::finalize`
    pub diagnostics: Vec<Diagnostic>,
}

impl CrossReference {
    /// Number of modules with at least one declaration
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.forward
            .iter()
            .map(|entry| entry.declarations.total_count())
            .sum()
    }

    /// Declarations of `module`, if it contributed any
    #[must_use]
    pub fn module(&self, module: &ModuleId) -> Option<&ModuleDeclarationSet> {
        self.forward
            .iter()
            .find(|entry| &entry.module == module)
            .map(|entry| &entry.declarations)
    }

    /// Contributions to `key` in `scope`
    #[must_use]
    pub fn contributions(&self, key: &str, scope: Scope) -> &[ReverseEntry] {
        self.reverse
            .get(key)
            .and_then(|scopes| scopes.get(&scope))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
