//! Shared JAR fixtures for integration tests
#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub const LOOKUP_CLASS: &str = "org/apache/logging/log4j/core/lookup/JndiLookup.class";
pub const MANAGER_CLASS: &str = "org/apache/logging/log4j/core/net/JndiManager.class";

/// Build a zip in memory from (name, contents) pairs, in the given order.
pub fn build_jar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
    buf
}

/// JndiManager bytes with the pre-2.15 `<init>(String, Context)` constructor
pub fn old_manager() -> Vec<u8> {
    let mut data = b"\xca\xfe\xba\xbe\x00\x00\x00\x31\x01\x00\x06".to_vec();
    data.extend_from_slice(b"<init>");
    data.extend_from_slice(b"\x01\x00\x2b");
    data.extend_from_slice(b"(Ljava/lang/String;Ljavax/naming/Context;)V");
    data.extend_from_slice(b"\x01\x00\x04Code");
    data
}

/// JndiManager bytes from 2.15: constructor moved, no 2.16 marker
pub fn unpatched_manager() -> Vec<u8> {
    let mut data = b"\xca\xfe\xba\xbe\x00\x00\x00\x31\x01\x00\x06".to_vec();
    data.extend_from_slice(b"<init>\x01\x00\x03()V\x01\x00\x0flookupWithRetry");
    data
}

/// JndiManager bytes from 2.16+, carrying `isJndiEnabled`
pub fn patched_manager() -> Vec<u8> {
    let mut data = unpatched_manager();
    data.extend_from_slice(b"\x01\x00\x0disJndiEnabled\x01\x00\x03()Z");
    data
}

pub fn lookup_class() -> Vec<u8> {
    b"\xca\xfe\xba\xbe\x00\x00\x00\x31\x01\x00\x06lookup".to_vec()
}

pub fn manifest(main_class: &str, version: &str) -> Vec<u8> {
    format!(
        "Manifest-Version: 1.0\r\nMain-Class: {main_class}\r\nImplementation-Version: {version}\r\n\r\n"
    )
    .into_bytes()
}

/// A jar bundling log4j < 2.15
pub fn vulnerable_jar() -> Vec<u8> {
    build_jar(&[
        (LOOKUP_CLASS, &lookup_class()),
        (MANAGER_CLASS, &old_manager()),
    ])
}

/// Wrap `inner` in `levels` layers of `lib/inner.jar`.
pub fn nest(inner: Vec<u8>, levels: usize) -> Vec<u8> {
    (0..levels).fold(inner, |jar, _| build_jar(&[("lib/inner.jar", &jar)]))
}
