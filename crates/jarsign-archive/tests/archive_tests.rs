//! Integration tests for detection, nested discovery and rewriting

mod common;

use common::*;
use jarsign_archive::{
    extract_nested, find_nested_archives, find_nested_archives_in, is_signed, open_archive,
    replace_entries, strip_signatures, SignatureScan,
};
use std::collections::BTreeMap;
use tempfile::TempDir;

// ============================================================================
// Already-signed detection
// ============================================================================

#[test]
fn test_unsigned_jar_is_not_signed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.jar");
    JarBuilder::new()
        .entry("org/example/App.class", b"code")
        .write_to(&path);

    assert!(!is_signed(&path).unwrap());
}

#[test]
fn test_fully_signed_jar_is_signed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("signed.jar");
    JarBuilder::new()
        .dir("org/example")
        .entry("org/example/App.class", b"code")
        .entry("org/example/Util.class", b"more code")
        .signed_all("release")
        .write_to(&path);

    let scan = SignatureScan::read_path(&path).unwrap();
    assert_eq!(scan.first_entry(), Some("org/example/App.class"));
    assert!(scan.is_signed());
}

#[test]
fn test_first_entry_unsigned_third_entry_signed_reports_unsigned() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.jar");
    JarBuilder::new()
        .entry("readme.txt", b"first")
        .entry("notes.txt", b"second")
        .entry("org/example/App.class", b"third")
        .signed_by("release", &["org/example/App.class"])
        .write_to(&path);

    let scan = SignatureScan::read_path(&path).unwrap();
    assert!(scan.entry_has_signer("org/example/App.class"));
    assert!(!scan.is_signed());
    assert!(!is_signed(&path).unwrap());
}

#[test]
fn test_archive_without_entries_is_not_signed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.jar");
    JarBuilder::new().without_manifest().write_to(&path);

    assert!(!is_signed(&path).unwrap());
}

#[test]
fn test_corrupt_archive_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.jar");
    std::fs::write(&path, b"definitely not a zip file").unwrap();

    assert!(is_signed(&path).is_err());
}

// ============================================================================
// Nested archives
// ============================================================================

#[test]
fn test_nested_discovery_is_one_level_deep() {
    let dir = TempDir::new().unwrap();
    let deepest = JarBuilder::new().entry("Deep.class", b"deep").build();
    let inner = JarBuilder::new()
        .entry("Inner.class", b"inner")
        .entry("lib/deepest.jar", &deepest)
        .build();
    let outer = dir.path().join("outer.jar");
    JarBuilder::new()
        .entry("Outer.class", b"outer")
        .entry("lib/inner.jar", &inner)
        .entry("lib/resources.zip", b"zip")
        .write_to(&outer);

    let nested = find_nested_archives_in(&outer).unwrap();
    let names: Vec<_> = nested.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["lib/inner.jar"]);
}

#[test]
fn test_extract_replace_roundtrip() {
    let dir = TempDir::new().unwrap();
    let inner = JarBuilder::new().entry("Inner.class", b"inner").build();
    let outer = dir.path().join("outer.jar");
    JarBuilder::new()
        .entry("Outer.class", b"outer")
        .entry("lib/inner.jar", &inner)
        .write_to(&outer);
    let checksum_before = sha256_file(&outer);

    let mut archive = open_archive(&outer).unwrap();
    let nested = find_nested_archives(&mut archive).unwrap();
    let extracted = extract_nested(&mut archive, &nested[0], dir.path()).unwrap();
    assert!(!is_signed(extracted.path()).unwrap());

    let signed_inner = JarBuilder::new()
        .entry("Inner.class", b"inner")
        .signed_all("release")
        .build();
    let mut replacements = BTreeMap::new();
    replacements.insert(nested[0].name.clone(), signed_inner);
    let rewritten = replace_entries(&outer, replacements, dir.path()).unwrap();

    assert_eq!(sha256_file(&outer), checksum_before);

    let mut archive = open_archive(rewritten.path()).unwrap();
    let nested = find_nested_archives(&mut archive).unwrap();
    let extracted = extract_nested(&mut archive, &nested[0], dir.path()).unwrap();
    assert!(is_signed(extracted.path()).unwrap());
}

// ============================================================================
// Signature removal
// ============================================================================

#[test]
fn test_strip_then_detect_reports_unsigned() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("signed.jar");
    JarBuilder::new()
        .entry("App.class", b"code")
        .signed_all("old-key")
        .write_to(&path);
    let checksum_before = sha256_file(&path);

    let stripped = strip_signatures(&path, dir.path()).unwrap();

    assert_eq!(stripped.removed.len(), 2);
    assert!(!is_signed(stripped.file.path()).unwrap());
    assert_eq!(sha256_file(&path), checksum_before);
}
