//! Declaration extraction
//!
//! A `DeclarationSource` knows which file holds its report kind in each
//! scope and turns the parsed records into `Declaration`s. A scope whose
//! file is missing contributes nothing; a scope whose file cannot be read
//! or parsed contributes nothing and leaves an error diagnostic behind.

use crate::declaration::{Declaration, ModuleDeclarationSet};
use crate::error::{ScanError, ScanResult};
use crate::parser::parse_declarations;
use crate::types::{Diagnostic, FileInfo, ModuleId, ReportKind, Scope};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Declarations of one module plus the problems met while reading them
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub declarations: ModuleDeclarationSet,
    pub diagnostics: Vec<Diagnostic>,
}

/// Reads one report kind's declarations from a module's `etc` tree
#[derive(Debug, Clone, Copy)]
pub struct DeclarationSource {
    kind: ReportKind,
}

impl DeclarationSource {
    #[must_use]
    pub fn new(kind: ReportKind) -> Self {
        Self { kind }
    }

    /// Configuration file for `scope` inside `module_dir`
    #[must_use]
    pub fn scope_file(&self, module_dir: &Path, scope: Scope) -> PathBuf {
        module_dir
            .join("etc")
            .join(scope.config_path(self.kind.config_file_name()))
    }

    /// Extract every scope of a module, in scope order
    pub fn extract(&self, module: &ModuleId, module_dir: &Path) -> Extraction {
        let mut extraction = Extraction::default();

        for scope in Scope::ALL {
            match self.extract_scope(module_dir, scope) {
                Ok(Some((file, declarations))) => {
                    debug!(
                        module = %module,
                        scope = %scope,
                        count = declarations.len(),
                        "parsed {:?}",
                        file.path
                    );
                    extraction.declarations.add_file(file);
                    for declaration in declarations {
                        extraction.declarations.push(declaration);
                    }
                }
                Ok(None) => {}
                Err(ScanError::MalformedConfiguration { path, message }) => {
                    warn!("Skipping malformed configuration {path:?}: {message}");
                    extraction.diagnostics.push(Diagnostic::error(format!(
                        "malformed configuration: `{}`",
                        path.display()
                    )));
                }
                Err(e) => {
                    let path = self.scope_file(module_dir, scope);
                    warn!("Skipping unreadable configuration {path:?}: {e}");
                    extraction.diagnostics.push(Diagnostic::error(format!(
                        "unable to read configuration: `{}`",
                        path.display()
                    )));
                }
            }
        }

        extraction
    }

    /// Extract one scope
    ///
    /// Returns `Ok(None)` when the scope has no configuration file.
    ///
    /// # Errors
    /// Returns `MalformedConfiguration` if the file does not parse, or an
    /// IO error if it exists but cannot be read
    pub fn extract_scope(
        &self,
        module_dir: &Path,
        scope: Scope,
    ) -> ScanResult<Option<(FileInfo, Vec<Declaration>)>> {
        let path = self.scope_file(module_dir, scope);
        let Some(content) = read_if_exists(&path)? else {
            return Ok(None);
        };

        let records = parse_declarations(&path, &content, self.kind)?;
        let declarations = records
            .into_iter()
            .map(|record| Declaration {
                source_key: record.source_key,
                customizer: record.customizer,
                scope,
            })
            .collect();

        let file = FileInfo {
            sha256: compute_sha256(&content),
            path,
        };
        Ok(Some((file, declarations)))
    }
}

/// Read a file in one step, mapping absence to `None`
///
/// # Errors
/// Returns any IO error other than `NotFound`
pub fn read_if_exists(path: &Path) -> ScanResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ScanError::Io(e)),
    }
}

fn compute_sha256(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
