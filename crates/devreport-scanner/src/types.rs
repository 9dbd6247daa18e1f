//! Shared types for the devreport scanner

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A discovered module, identified by its vendor and module directory names
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    /// Vendor directory name
    pub vendor: String,
    /// Module directory name
    pub name: String,
}

impl ModuleId {
    #[must_use]
    pub fn new(vendor: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            name: name.into(),
        }
    }

    /// Identity key, `Vendor_Module`
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}_{}", self.vendor, self.name)
    }

    /// Directory of this module below the code root
    #[must_use]
    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(&self.vendor).join(&self.name)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.vendor, self.name)
    }
}

/// Area in which a customization is declared
///
/// The declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Applies everywhere (`etc/`)
    Global,
    /// Admin area only (`etc/adminhtml/`)
    #[serde(rename = "adminhtml")]
    AdminArea,
    /// Storefront only (`etc/frontend/`)
    #[serde(rename = "frontend")]
    FrontendArea,
}

impl Scope {
    /// All scopes in report order
    pub const ALL: [Scope; 3] = [Scope::Global, Scope::AdminArea, Scope::FrontendArea];

    /// Area code as written in the module's `etc` tree
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::AdminArea => "adminhtml",
            Scope::FrontendArea => "frontend",
        }
    }

    /// Path of `file_name` for this scope, relative to the module's `etc` directory
    #[must_use]
    pub fn config_path(self, file_name: &str) -> PathBuf {
        match self {
            Scope::Global => PathBuf::from(file_name),
            Scope::AdminArea | Scope::FrontendArea => Path::new(self.as_str()).join(file_name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of customization point a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Event subscriptions declared in `events.xml`
    Observer,
    /// Method interceptors declared in `di.xml`
    Plugin,
    /// Class substitutions declared in `di.xml`
    Preference,
}

impl ReportKind {
    /// Configuration file holding this kind of declaration
    #[must_use]
    pub fn config_file_name(self) -> &'static str {
        match self {
            ReportKind::Observer => "events.xml",
            ReportKind::Plugin | ReportKind::Preference => "di.xml",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Observer => "Observers report",
            ReportKind::Plugin => "Plugins report",
            ReportKind::Preference => "Preferences report",
        }
    }

    /// Prefix of the generated report file name
    #[must_use]
    pub fn file_prefix(self) -> &'static str {
        match self {
            ReportKind::Observer => "Observers",
            ReportKind::Plugin => "Plugins",
            ReportKind::Preference => "Preferences",
        }
    }

    /// Column header for the source key in the per-module tables
    #[must_use]
    pub fn key_label(self) -> &'static str {
        match self {
            ReportKind::Observer => "Event name",
            ReportKind::Plugin => "Intercepted type",
            ReportKind::Preference => "Overridden class",
        }
    }

    /// Title of the reverse section
    #[must_use]
    pub fn target_title(self) -> &'static str {
        match self {
            ReportKind::Observer => "Events",
            ReportKind::Plugin | ReportKind::Preference => "Target class",
        }
    }

    /// Whether repeated targets are conflicting overrides
    #[must_use]
    pub fn tracks_overrides(self) -> bool {
        matches!(self, ReportKind::Preference)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportKind::Observer => "observer",
            ReportKind::Plugin => "plugin",
            ReportKind::Preference => "preference",
        })
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A message surfaced in the report's diagnostics block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Information about a parsed configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path to the file
    pub path: PathBuf,
    /// SHA256 hash of the file contents
    pub sha256: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_order_is_report_order() {
        let mut scopes = vec![Scope::FrontendArea, Scope::Global, Scope::AdminArea];
        scopes.sort();
        assert_eq!(scopes, Scope::ALL.to_vec());
    }

    #[test]
    fn test_scope_config_path() {
        assert_eq!(Scope::Global.config_path("di.xml"), PathBuf::from("di.xml"));
        assert_eq!(
            Scope::AdminArea.config_path("di.xml"),
            Path::new("adminhtml").join("di.xml")
        );
        assert_eq!(
            Scope::FrontendArea.config_path("events.xml"),
            Path::new("frontend").join("events.xml")
        );
    }

    #[test]
    fn test_module_key() {
        let id = ModuleId::new("Acme", "Foo");
        assert_eq!(id.key(), "Acme_Foo");
        assert_eq!(id.to_string(), "Acme_Foo");
    }

    #[test]
    fn test_scope_serializes_as_area_code() {
        let json = serde_json::to_string(&Scope::AdminArea).unwrap();
        assert_eq!(json, "\"adminhtml\"");
    }
}
