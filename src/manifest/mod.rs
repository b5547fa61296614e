//! Integration manifest reading, version rewriting, and component discovery.
//!
//! A Home Assistant custom integration lives at
//! `custom_components/<domain>/manifest.json`. Only the `version` field is
//! ever rewritten; the rest of the document (and its key order) is preserved.

use std::io::Write;
use std::path::{Path, PathBuf};

use semver::Version;
use tracing::debug;

use crate::error::ManifestError;
use crate::version::parse_version;

/// A loaded integration manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Path to the manifest.json file.
    pub path: PathBuf,
    /// Integration domain (manifest field, or the directory name).
    pub domain: String,
    /// Current version from the `version` field.
    pub version: Version,
    document: serde_json::Value,
}

impl Manifest {
    /// Load and validate a manifest from `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ManifestError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| ManifestError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let raw_version = document
            .get("version")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ManifestError::MissingVersion(path.to_path_buf()))?;

        let version = parse_version(raw_version).map_err(|e| ManifestError::Version {
            path: path.to_path_buf(),
            source: e,
        })?;

        let domain = document
            .get("domain")
            .and_then(|d| d.as_str())
            .map(String::from)
            .or_else(|| dir_name(path))
            .unwrap_or_else(|| "component".to_string());

        debug!(path = %path.display(), domain = %domain, version = %version, "Loaded manifest");

        Ok(Self {
            path: path.to_path_buf(),
            domain,
            version,
            document,
        })
    }

    /// The directory holding the component sources.
    pub fn component_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Replace the in-memory version. Call [`Manifest::save`] to persist.
    pub fn set_version(&mut self, version: Version) {
        self.document["version"] = serde_json::Value::String(version.to_string());
        self.version = version;
    }

    /// Persist the manifest atomically.
    ///
    /// Writes to a temp file in the manifest's directory and renames it over
    /// the original, so a failed write never leaves a corrupted manifest.
    pub fn save(&self) -> Result<(), ManifestError> {
        let dir = self.component_dir();

        let serialized =
            serde_json::to_string_pretty(&self.document).map_err(|e| ManifestError::ParseFailed {
                path: self.path.clone(),
                source: e,
            })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            ManifestError::WriteFailed {
                path: self.path.clone(),
                source: e,
            }
        })?;

        // Trailing newline matches how hassfest formats manifests
        writeln!(tmp, "{}", serialized).map_err(|e| ManifestError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        tmp.persist(&self.path)
            .map_err(|e| ManifestError::WriteFailed {
                path: self.path.clone(),
                source: e.error,
            })?;

        Ok(())
    }
}

/// Locate the single component manifest under `root`.
///
/// Scans `custom_components/*/manifest.json`. Exactly one component is
/// expected; zero or several are errors (several can be disambiguated with
/// an explicit path).
pub fn discover(root: &Path) -> Result<Manifest, ManifestError> {
    let components_dir = root.join("custom_components");
    if !components_dir.is_dir() {
        return Err(ManifestError::NoComponent(root.to_path_buf()));
    }

    let mut manifests = Vec::new();

    let entries = std::fs::read_dir(&components_dir).map_err(|e| ManifestError::ReadFailed {
        path: components_dir.clone(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ManifestError::ReadFailed {
            path: components_dir.clone(),
            source: e,
        })?;
        let manifest_path = entry.path().join("manifest.json");
        if manifest_path.is_file() {
            manifests.push(manifest_path);
        }
    }

    manifests.sort();

    match manifests.len() {
        0 => Err(ManifestError::NoComponent(root.to_path_buf())),
        1 => Manifest::load(&manifests[0]),
        _ => {
            let domains: Vec<String> = manifests
                .iter()
                .filter_map(|p| p.parent().and_then(dir_name_of))
                .collect();
            Err(ManifestError::AmbiguousComponent {
                domains: domains.join(", "),
            })
        }
    }
}

fn dir_name(manifest_path: &Path) -> Option<String> {
    manifest_path.parent().and_then(dir_name_of)
}

fn dir_name_of(dir: &Path) -> Option<String> {
    dir.file_name().map(|n| n.to_string_lossy().into_owned())
}
