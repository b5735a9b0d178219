//! Conformance tests that run YAML fixtures against linkwise
//!
//! Run with: cargo test -p linkwise-test --test conformance --features linkwise-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use linkwise_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixtures live next to this crate's manifest
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run every fixture document in one file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_unwinding() {
    run_fixture_file("01_unwinding.yaml");
}

#[test]
fn test_merchant_matching() {
    run_fixture_file("02_merchant_matching.yaml");
}

#[test]
fn test_redirects() {
    run_fixture_file("03_redirects.yaml");
}

#[test]
fn test_links() {
    run_fixture_file("04_links.yaml");
}

#[test]
fn every_fixture_file_is_covered() {
    let mut files: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read fixtures dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
        .collect();
    files.sort();
    assert_eq!(
        files,
        [
            "01_unwinding.yaml",
            "02_merchant_matching.yaml",
            "03_redirects.yaml",
            "04_links.yaml"
        ]
    );
}
