//! Release artifact packaging.
//!
//! Zips a component directory into the single artifact attached to the
//! GitHub release. Entries are relative to the component directory root,
//! matching how Home Assistant expects integration zips to unpack.

use std::fs::File;
use std::path::{Component, Path};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

/// Package `component_dir` into a zip archive at `dest`.
///
/// Entries are written in sorted order so the artifact is reproducible.
/// `__pycache__` directories are skipped. Returns the artifact size in bytes.
pub fn package_component(component_dir: &Path, dest: &Path) -> Result<u64, ArchiveError> {
    if !component_dir.is_dir() {
        return Err(ArchiveError::ComponentMissing(component_dir.to_path_buf()));
    }

    let file = File::create(dest).map_err(|e| ArchiveError::Io {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut file_count = 0usize;

    let walker = WalkDir::new(component_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_pycache(e));

    for entry in walker {
        let entry = entry.map_err(ArchiveError::WalkFailed)?;
        let path = entry.path();

        if path == component_dir {
            continue;
        }

        let name = entry_name(component_dir, path)?;

        if entry.file_type().is_dir() {
            writer
                .add_directory(name, options)
                .map_err(ArchiveError::ZipFailed)?;
        } else if entry.file_type().is_file() {
            writer
                .start_file(name, options)
                .map_err(ArchiveError::ZipFailed)?;

            let mut source = File::open(path).map_err(|e| ArchiveError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            std::io::copy(&mut source, &mut writer).map_err(|e| ArchiveError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            file_count += 1;
        }
        // Symlinks and other special files are not expected in a component
    }

    if file_count == 0 {
        return Err(ArchiveError::EmptyComponent(component_dir.to_path_buf()));
    }

    writer.finish().map_err(ArchiveError::ZipFailed)?;

    let size = std::fs::metadata(dest)
        .map(|m| m.len())
        .map_err(|e| ArchiveError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;

    debug!(
        artifact = %dest.display(),
        files = file_count,
        bytes = size,
        "Packaged component"
    );

    Ok(size)
}

fn is_pycache(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == "__pycache__"
}

/// Zip entry name for `path`, relative to the component root, with forward
/// slashes regardless of platform.
fn entry_name(root: &Path, path: &Path) -> Result<String, ArchiveError> {
    let relative = path.strip_prefix(root).map_err(|_| ArchiveError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::other("path escapes component directory"),
    })?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    Ok(parts.join("/"))
}
