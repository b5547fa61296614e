//! Tag enumeration, used to detect release-tag collisions before mutating
//! anything.

use git2::Repository;
use tracing::debug;

use crate::error::GitError;

/// Check whether a tag with the given name exists.
pub fn tag_exists(repo: &Repository, tag_name: &str) -> Result<bool, GitError> {
    let mut found = false;

    repo.tag_foreach(|_oid, name_bytes| {
        if let Ok(name_str) = std::str::from_utf8(name_bytes) {
            let name = name_str.strip_prefix("refs/tags/").unwrap_or(name_str);
            if name == tag_name {
                found = true;
                return false; // stop iteration
            }
        }
        true
    })
    .map_err(GitError::TagLookup)?;

    if found {
        debug!(tag = tag_name, "Tag already exists");
    }

    Ok(found)
}
