//! Entry point tests: paths on disk, custom filesystems, and report output

mod common;

use common::*;
use log4jscan::{parse, parse_path, ArchiveEntry, EntryFs, EntryKind, Report, ScanError};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use tempfile::TempDir;

/// Scripted filesystem: directory listings and file contents are fixed up front.
#[derive(Default)]
struct FakeFs {
    dirs: BTreeMap<String, Vec<ArchiveEntry>>,
    files: BTreeMap<String, Vec<u8>>,
    opened: Vec<String>,
}

impl FakeFs {
    fn dir(mut self, path: &str, entries: Vec<ArchiveEntry>) -> Self {
        self.dirs.insert(path.to_string(), entries);
        self
    }

    fn file(mut self, path: &str, data: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), data);
        self
    }
}

impl EntryFs for FakeFs {
    fn read_dir(&mut self, dir: &str) -> io::Result<Vec<ArchiveEntry>> {
        self.dirs
            .get(dir)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, dir.to_string()))
    }

    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        self.opened.push(path.to_string());
        match self.files.get(path) {
            Some(data) => Ok(Box::new(data.as_slice())),
            None => Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        }
    }
}

fn file(name: &str, size: u64) -> ArchiveEntry {
    ArchiveEntry::new(name, EntryKind::File, size)
}

fn dir(name: &str) -> ArchiveEntry {
    ArchiveEntry::new(name, EntryKind::Dir, 0)
}

// =============================================================================
// Custom Filesystem Tests
// =============================================================================

#[test]
fn test_self_listing_directory_does_not_recurse() {
    let lookup = lookup_class();
    let manager = unpatched_manager();
    let mut fake = FakeFs::default()
        .dir(".", vec![dir("."), dir("net")])
        .dir(
            "net",
            vec![
                dir("net"),
                file("JndiLookup.class", lookup.len() as u64),
                file("JndiManager.class", manager.len() as u64),
            ],
        )
        .file("net/JndiLookup.class", lookup)
        .file("net/JndiManager.class", manager);

    let report = parse(&mut fake).unwrap();
    assert!(report.vulnerable);
    assert_eq!(fake.opened, vec!["net/JndiLookup.class", "net/JndiManager.class"]);
}

#[test]
fn test_oversized_class_fails_before_open() {
    let mut fake = FakeFs::default().dir(".", vec![file("Huge.class", 5 << 30)]);

    let err = parse(&mut fake).unwrap_err();
    assert!(err.is_resource_limit());
    assert!(matches!(err, ScanError::BudgetExceeded { size, .. } if size == 5 << 30));
    assert!(fake.opened.is_empty());
}

#[test]
fn test_oversized_nested_archive_fails_before_open() {
    let mut fake = FakeFs::default()
        .dir(".", vec![dir("lib")])
        .dir("lib", vec![file("huge.war", (4 << 30) + 1)]);

    let err = parse(&mut fake).unwrap_err();
    assert!(err.is_resource_limit());
    assert!(err.to_string().contains("lib/huge.war"));
    assert!(fake.opened.is_empty());
}

#[test]
fn test_nested_archive_larger_than_declared_is_fatal() {
    let inner = vulnerable_jar();
    let declared = inner.len() as u64 - 1;
    let mut fake = FakeFs::default()
        .dir(".", vec![dir("lib")])
        .dir("lib", vec![file("app.jar", declared)])
        .file("lib/app.jar", inner);

    let err = parse(&mut fake).unwrap_err();
    assert!(!err.is_resource_limit());
    assert!(matches!(err, ScanError::Io { ref path, ref source, .. }
        if path == "lib/app.jar" && source.kind() == io::ErrorKind::InvalidData));
}

#[test]
fn test_nested_archive_at_declared_size_is_scanned() {
    let inner = vulnerable_jar();
    let mut fake = FakeFs::default()
        .dir(".", vec![dir("lib")])
        .dir("lib", vec![file("app.jar", inner.len() as u64)])
        .file("lib/app.jar", inner);

    assert!(parse(&mut fake).unwrap().vulnerable);
}

#[test]
fn test_class_open_failure_is_fatal() {
    let mut fake = FakeFs::default().dir(".", vec![file("Secret.class", 10)]);

    let err = parse(&mut fake).unwrap_err();
    assert!(!err.is_resource_limit());
    assert_eq!(err.to_string(), "opening file Secret.class: denied");
}

#[test]
fn test_listing_failure_is_fatal() {
    let mut fake = FakeFs::default().dir(".", vec![dir("missing")]);
    let err = parse(&mut fake).unwrap_err();
    assert!(matches!(err, ScanError::Io { ref path, .. } if path == "missing"));
}

#[test]
fn test_unknown_entries_are_not_opened() {
    let mut fake = FakeFs::default().dir(
        ".",
        vec![
            file("README.md", 10),
            file("app.properties", 10),
            ArchiveEntry::new("link.class", EntryKind::Other, 10),
        ],
    );
    assert_eq!(parse(&mut fake).unwrap(), Report::default());
    assert!(fake.opened.is_empty());
}

// =============================================================================
// Path Tests
// =============================================================================

#[test]
fn test_parse_path_jar_file() {
    let temp_dir = TempDir::new().unwrap();
    let jar_path = temp_dir.path().join("app.jar");
    fs::write(&jar_path, vulnerable_jar()).unwrap();

    assert!(parse_path(&jar_path).unwrap().vulnerable);
}

#[test]
fn test_parse_path_extracted_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("META-INF")).unwrap();
    fs::create_dir_all(root.join("org/apache/logging/log4j/core/lookup")).unwrap();
    fs::create_dir_all(root.join("org/apache/logging/log4j/core/net")).unwrap();
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::write(root.join("META-INF/MANIFEST.MF"), manifest("com.example.Main", "3.1")).unwrap();
    fs::write(root.join(LOOKUP_CLASS), lookup_class()).unwrap();
    fs::write(root.join(MANAGER_CLASS), patched_manager()).unwrap();
    fs::write(root.join("lib/not-a-jar.jar"), b"plain text").unwrap();

    let report = parse_path(root).unwrap();
    assert_eq!(
        report,
        Report {
            vulnerable: false,
            main_class: "com.example.Main".to_string(),
            version: "3.1".to_string(),
        }
    );

    fs::write(root.join(MANAGER_CLASS), unpatched_manager()).unwrap();
    assert!(parse_path(root).unwrap().vulnerable);
}

#[test]
fn test_parse_path_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = parse_path(temp_dir.path().join("nope.jar")).unwrap_err();
    assert!(matches!(err, ScanError::Io { .. }));
}

// =============================================================================
// Report Output Tests
// =============================================================================

#[test]
fn test_report_serializes_to_json() {
    let report = Report {
        vulnerable: true,
        main_class: "com.example.Main".to_string(),
        version: "1.2.3".to_string(),
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "vulnerable": true,
            "main_class": "com.example.Main",
            "version": "1.2.3",
        })
    );
    let back: Report = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}
