//! Integration tests for manifest loading, rewriting, and discovery.

mod common;

use haship::error::ManifestError;
use haship::manifest::{Manifest, discover};
use haship::version::bump_patch;
use semver::Version;

use common::{temp_test_dir, write_component_manifest};

#[test]
fn test_discover_and_bump_round_trip() {
    let dir = temp_test_dir();
    write_component_manifest(dir.path(), "flair", "0.3.7");

    let mut manifest = discover(dir.path()).unwrap();
    assert_eq!(manifest.domain, "flair");
    assert_eq!(manifest.version, Version::new(0, 3, 7));

    let next = bump_patch(&manifest.version).unwrap();
    manifest.set_version(next);
    manifest.save().unwrap();

    // Reload and verify the persisted bump
    let reloaded = discover(dir.path()).unwrap();
    assert_eq!(reloaded.version, Version::new(0, 3, 8));
}

#[test]
fn test_save_preserves_other_fields() {
    let dir = temp_test_dir();
    let path = write_component_manifest(dir.path(), "flair", "1.0.0");

    let mut manifest = Manifest::load(&path).unwrap();
    manifest.set_version(Version::new(1, 0, 1));
    manifest.save().unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document["domain"], "flair");
    assert_eq!(document["name"], "flair");
    assert_eq!(document["version"], "1.0.1");
}

#[test]
fn test_malformed_version_never_written_back() {
    let dir = temp_test_dir();
    let component = dir.path().join("custom_components").join("broken");
    std::fs::create_dir_all(&component).unwrap();
    let path = component.join("manifest.json");
    let original = r#"{"domain": "broken", "version": "1.2"}"#;
    std::fs::write(&path, original).unwrap();

    let result = discover(dir.path());
    assert!(matches!(result, Err(ManifestError::Version { .. })));

    // The file must be untouched after a failed load
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_component_dir_points_at_sources() {
    let dir = temp_test_dir();
    let path = write_component_manifest(dir.path(), "flair", "1.0.0");

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(
        manifest.component_dir(),
        dir.path().join("custom_components").join("flair")
    );
}

#[test]
fn test_discover_reports_all_candidate_domains() {
    let dir = temp_test_dir();
    write_component_manifest(dir.path(), "alpha", "1.0.0");
    write_component_manifest(dir.path(), "beta", "2.0.0");

    match discover(dir.path()) {
        Err(ManifestError::AmbiguousComponent { domains }) => {
            assert_eq!(domains, "alpha, beta");
        }
        other => panic!("Expected AmbiguousComponent, got {:?}", other),
    }
}
