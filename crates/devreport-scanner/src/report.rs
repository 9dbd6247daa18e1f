//! Render-ready report model
//!
//! The assembler walks the forward index to build the per-module view
//! (checking every customizer class on the way) and the reverse index to
//! build the per-target view, one section per target key.

use crate::aggregate::CrossReference;
use crate::resolver::ClassResolvabilityChecker;
use crate::types::{Diagnostic, FileInfo, ReportKind, Scope, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete report, ready to be rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    /// Header of the source key column in module sections
    pub key_label: String,
    /// Title of the per-target part
    pub target_title: String,
    pub generated_at: DateTime<Utc>,
    /// One section per module with declarations, in scan order
    pub modules: Vec<ModuleSection>,
    /// One section per customized target, in key order
    pub targets: Vec<TargetSection>,
    /// Every diagnostic, in emission order
    pub diagnostics: Vec<Diagnostic>,
    /// Configuration files parsed during the run
    pub files_scanned: Vec<FileInfo>,
    pub summary: Summary,
}

/// Declarations of one module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSection {
    /// `Vendor_Module`
    pub module: String,
    pub total: usize,
    pub rows: Vec<ModuleRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRow {
    pub key: String,
    pub scope: Scope,
    pub customizer: String,
}

/// Contributions to one customized target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSection {
    pub target: String,
    /// Number of preferences naming this target (preference reports only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_count: Option<usize>,
    pub rows: Vec<TargetRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRow {
    /// `Vendor_Module`
    pub module: String,
    pub scope: Scope,
    pub customizer: String,
}

/// Counts shown at the top of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub modules: usize,
    pub declarations: usize,
    pub targets: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl Report {
    /// Whether the diagnostics block is empty
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Turns a finished cross-reference into a `Report`
#[derive(Debug)]
pub struct ReportAssembler {
    checker: ClassResolvabilityChecker,
}

impl ReportAssembler {
    #[must_use]
    pub fn new(checker: ClassResolvabilityChecker) -> Self {
        Self { checker }
    }

    /// Build the report
    ///
    /// `diagnostics` holds what was emitted before assembly (extraction
    /// problems); the anomalies of `xref` and the resolvability checks
    /// are appended after them.
    pub fn assemble(
        mut self,
        xref: CrossReference,
        mut diagnostics: Vec<Diagnostic>,
        files_scanned: Vec<FileInfo>,
        generated_at: DateTime<Utc>,
    ) -> Report {
        let kind = xref.kind;
        diagnostics.extend(xref.diagnostics.iter().cloned());

        let mut modules = Vec::with_capacity(xref.forward.len());
        for entry in &xref.forward {
            let mut rows = Vec::with_capacity(entry.declarations.total_count());
            for declaration in entry.declarations.iter() {
                if let Some(diagnostic) = self.checker.check(&declaration.customizer) {
                    diagnostics.push(diagnostic);
                }
                rows.push(ModuleRow {
                    key: declaration.source_key.clone(),
                    scope: declaration.scope,
                    customizer: declaration.customizer.clone(),
                });
            }
            modules.push(ModuleSection {
                module: entry.module.key(),
                total: entry.declarations.total_count(),
                rows,
            });
        }

        let targets: Vec<TargetSection> = xref
            .reverse
            .iter()
            .map(|(target, scopes)| TargetSection {
                target: target.clone(),
                override_count: xref.override_tally.get(target).copied(),
                rows: Scope::ALL
                    .iter()
                    .flat_map(|scope| {
                        scopes.get(scope).into_iter().flatten().map(|entry| TargetRow {
                            module: entry.module.key(),
                            scope: *scope,
                            customizer: entry.customizer.clone(),
                        })
                    })
                    .collect(),
            })
            .collect();

        let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
        let summary = Summary {
            modules: modules.len(),
            declarations: xref.declaration_count(),
            targets: targets.len(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            infos: count(Severity::Info),
        };

        Report {
            kind,
            title: kind.title().to_string(),
            key_label: kind.key_label().to_string(),
            target_title: kind.target_title().to_string(),
            generated_at,
            modules,
            targets,
            diagnostics,
            files_scanned,
            summary,
        }
    }
}
