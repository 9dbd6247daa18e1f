//! Declaration types

use crate::types::{FileInfo, Scope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One customization: `source_key` is customized by `customizer` in `scope`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Event name, intercepted type or overridden class
    pub source_key: String,
    /// Fully-qualified class implementing the customization
    pub customizer: String,
    /// Scope of the file the declaration was read from
    pub scope: Scope,
}

/// All declarations of one module, grouped by scope
///
/// Totals are maintained on insertion, so `total_count` always equals the
/// sum of the per-scope totals and each per-scope total equals the length
/// of that scope's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclarationSet {
    per_scope: BTreeMap<Scope, Vec<Declaration>>,
    total_per_scope: BTreeMap<Scope, usize>,
    total_count: usize,
    /// Configuration files that were parsed for this module
    #[serde(default)]
    files: Vec<FileInfo>,
}

impl Default for ModuleDeclarationSet {
    fn default() -> Self {
        Self {
            per_scope: Scope::ALL.iter().map(|s| (*s, Vec::new())).collect(),
            total_per_scope: Scope::ALL.iter().map(|s| (*s, 0)).collect(),
            total_count: 0,
            files: Vec::new(),
        }
    }
}

impl ModuleDeclarationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration to its scope
    pub fn push(&mut self, declaration: Declaration) {
        let scope = declaration.scope;
        self.per_scope.entry(scope).or_default().push(declaration);
        *self.total_per_scope.entry(scope).or_default() += 1;
        self.total_count += 1;
    }

    /// Record a configuration file that contributed to this set
    pub fn add_file(&mut self, file: FileInfo) {
        self.files.push(file);
    }

    /// Declarations of one scope, in file order
    #[must_use]
    pub fn scope(&self, scope: Scope) -> &[Declaration] {
        self.per_scope.get(&scope).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    #[must_use]
    pub fn total_in(&self, scope: Scope) -> usize {
        self.total_per_scope.get(&scope).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    #[must_use]
    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    /// All declarations, scopes in report order
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        Scope::ALL.into_iter().flat_map(move |s| self.scope(s).iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(key: &str, scope: Scope) -> Declaration {
        Declaration {
            source_key: key.to_string(),
            customizer: format!("Acme\\Foo\\{key}"),
            scope,
        }
    }

    #[test]
    fn test_totals_follow_pushes() {
        let mut set = ModuleDeclarationSet::new();
        assert!(set.is_empty());

        set.push(decl("a", Scope::FrontendArea));
        set.push(decl("b", Scope::Global));
        set.push(decl("c", Scope::FrontendArea));

        assert_eq!(set.total_count(), 3);
        assert_eq!(set.total_in(Scope::Global), 1);
        assert_eq!(set.total_in(Scope::AdminArea), 0);
        assert_eq!(set.total_in(Scope::FrontendArea), 2);
        let sum: usize = Scope::ALL.iter().map(|s| set.total_in(*s)).sum();
        assert_eq!(sum, set.total_count());
        for scope in Scope::ALL {
            assert_eq!(set.scope(scope).len(), set.total_in(scope));
        }
    }

    #[test]
    fn test_iter_uses_scope_order() {
        let mut set = ModuleDeclarationSet::new();
        set.push(decl("front", Scope::FrontendArea));
        set.push(decl("admin", Scope::AdminArea));
        set.push(decl("global", Scope::Global));

        let keys: Vec<&str> = set.iter().map(|d| d.source_key.as_str()).collect();
        assert_eq!(keys, vec!["global", "admin", "front"]);
    }
}
