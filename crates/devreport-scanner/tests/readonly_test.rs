//! Non-destructive guarantee tests
//!
//! A scan only reads the module tree: nothing under the code root may be
//! created, modified or removed, whatever the report kind.

use devreport_scanner::resolver::TypeResolution;
use devreport_scanner::{ModuleSelection, ReportKind, ScanConfig, Scanner};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Compute SHA256 hash of a file
fn hash_file(path: &Path) -> Option<String> {
    let content = fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Some(hex::encode(hasher.finalize()))
}

/// Hash of every file plus the list of directories below `path`
fn snapshot_directory(path: &Path) -> HashMap<String, Option<String>> {
    let mut snapshot = HashMap::new();

    for entry in WalkDir::new(path).into_iter().filter_map(Result::ok) {
        let relative_path = entry
            .path()
            .strip_prefix(path)
            .unwrap()
            .to_string_lossy()
            .to_string();
        if entry.file_type().is_file() {
            snapshot.insert(relative_path, hash_file(entry.path()));
        } else if entry.file_type().is_dir() {
            snapshot.insert(relative_path, None);
        }
    }

    snapshot
}

fn write(base: &Path, rel: &str, content: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A code root with every configuration file kind, one malformed file and
/// one excluded vendor
fn create_readonly_test_fixture() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let base = temp_dir.path();

    write(
        base,
        "Acme/Foo/etc/events.xml",
        r#"<config><event name="sales_order_place_after"><observer name="a" instance="Acme\Foo\Observer\Place"/></event></config>"#,
    );
    write(
        base,
        "Acme/Foo/etc/di.xml",
        r#"<config>
    <preference for="Magento\Catalog\Model\Product" type="Acme\Foo\Model\Product"/>
    <type name="Magento\Checkout\Model\Cart"><plugin name="p" type="Acme\Foo\Plugin\Cart"/></type>
</config>"#,
    );
    write(
        base,
        "Acme/Foo/etc/adminhtml/di.xml",
        r#"<config><preference for="Magento\Sales\Model\Order" type="Acme\Foo\Model\Order"/></config>"#,
    );
    write(base, "Acme/Foo/etc/frontend/events.xml", "<config><event name=");
    write(
        base,
        "Acme/Foo/composer.json",
        r#"{"autoload": {"psr-4": {"Acme\\Foo\\": ""}}}"#,
    );
    write(
        base,
        "Acme/Foo/Model/Product.php",
        "<?php\nnamespace Acme\\Foo\\Model;\n\nclass Product\n{\n}\n",
    );
    write(
        base,
        "Magento/Catalog/etc/di.xml",
        r#"<config><preference for="A" type="B"/></config>"#,
    );
    fs::create_dir_all(base.join("Beta").join("Empty")).unwrap();

    temp_dir
}

fn run_all_kinds(root: &Path, resolver_is_stubbed: bool) {
    let config = ScanConfig {
        code_root: root.to_path_buf(),
        ..ScanConfig::default()
    };
    let mut scanner = Scanner::new(config);
    if resolver_is_stubbed {
        scanner = scanner.with_resolver(|_: &str| TypeResolution::Exists);
    }
    for kind in [ReportKind::Observer, ReportKind::Plugin, ReportKind::Preference] {
        let result = scanner.scan(kind, &ModuleSelection::All);
        assert!(result.is_ok(), "{kind} scan should succeed");
    }
}

#[test]
fn test_scanner_is_readonly_full_scan() {
    let fixture = create_readonly_test_fixture();

    // Take snapshot before scanning
    let before_snapshot = snapshot_directory(fixture.path());

    // The PSR-4 resolver reads composer.json and PHP sources too
    run_all_kinds(fixture.path(), false);

    let after_snapshot = snapshot_directory(fixture.path());
    assert_eq!(
        before_snapshot, after_snapshot,
        "Scanning must not touch the module tree"
    );
}

#[test]
fn test_scanner_is_readonly_multiple_scans() {
    let fixture = create_readonly_test_fixture();
    let initial_snapshot = snapshot_directory(fixture.path());

    for _ in 0..5 {
        run_all_kinds(fixture.path(), true);
    }

    let final_snapshot = snapshot_directory(fixture.path());
    assert_eq!(
        initial_snapshot.len(),
        final_snapshot.len(),
        "Number of entries should not change after multiple scans"
    );
    for (path, initial_hash) in &initial_snapshot {
        assert_eq!(
            Some(initial_hash),
            final_snapshot.get(path),
            "Entry {path} should not be modified after multiple scans"
        );
    }
}

#[test]
fn test_single_module_scan_is_readonly() {
    let fixture = create_readonly_test_fixture();
    let before_snapshot = snapshot_directory(fixture.path());

    let config = ScanConfig {
        code_root: fixture.path().to_path_buf(),
        ..ScanConfig::default()
    };
    let scanner = Scanner::new(config);
    let selection = ModuleSelection::Single("Acme_Foo".into());
    assert!(scanner.scan(ReportKind::Preference, &selection).is_ok());
    assert!(scanner
        .scan(ReportKind::Plugin, &ModuleSelection::Single("Acme_Missing".into()))
        .is_err());

    assert_eq!(before_snapshot, snapshot_directory(fixture.path()));
}

#[test]
fn test_scanner_preserves_timestamps() {
    let fixture = create_readonly_test_fixture();

    let mtimes = |root: &Path| -> HashMap<String, std::time::SystemTime> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let relative = e.path().strip_prefix(root).unwrap().to_string_lossy().to_string();
                (relative, fs::metadata(e.path()).unwrap().modified().unwrap())
            })
            .collect()
    };

    let before = mtimes(fixture.path());

    // Small delay to ensure any modifications would show a timestamp change
    std::thread::sleep(std::time::Duration::from_millis(100));
    run_all_kinds(fixture.path(), false);

    assert_eq!(before, mtimes(fixture.path()));
}
