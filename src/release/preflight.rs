//! Preflight checks for the release pipeline.
//!
//! Validates the git environment, working tree state, and manifest before
//! anything is mutated.

use std::path::Path;
use std::process::Command;

use git2::Repository;

use crate::error::{GitError, ReleaseError};
use crate::git::{HeadCommit, head_commit};
use crate::manifest::{Manifest, discover};

/// Result of all preflight checks.
pub struct PreflightResult {
    pub manifest: Manifest,
    pub head: HeadCommit,
    pub current_branch: String,
    pub remote_name: String,
    pub upstream_branch: String,
}

struct TrackingBranch {
    remote: String,
    branch: String,
}

/// Run all preflight checks.
///
/// Checks (in order):
/// 1. git binary available
/// 2. Clean working tree
/// 3. On a branch with upstream tracking configured (or a --remote override)
/// 4. Manifest found and well-formed
/// 5. HEAD commit resolvable
pub fn run_checks(
    repo: &Repository,
    manifest_path: Option<&Path>,
    remote_override: Option<&str>,
) -> Result<PreflightResult, ReleaseError> {
    // 1. git binary (commit/push shell out to it)
    which::which("git").map_err(|_| GitError::GitNotInstalled)?;

    // 2. Clean working tree
    check_clean_working_tree()?;

    // 3. Branch and upstream tracking
    let current_branch = get_current_branch(repo)?;
    let tracking = resolve_tracking(repo, &current_branch, remote_override)?;

    // 4. Manifest
    let workdir = repo
        .workdir()
        .ok_or_else(|| GitError::CommandFailed {
            operation: "open".to_string(),
            stderr: "bare repository not supported".to_string(),
        })?;

    let manifest = match manifest_path {
        Some(path) => Manifest::load(path)?,
        None => discover(workdir)?,
    };

    // 5. HEAD commit (release body defaults to its message)
    let head = head_commit(repo)?;

    Ok(PreflightResult {
        manifest,
        head,
        current_branch,
        remote_name: tracking.remote,
        upstream_branch: tracking.branch,
    })
}

/// Check that the working tree is clean (no uncommitted changes).
fn check_clean_working_tree() -> Result<(), GitError> {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .map_err(|e| GitError::CommandFailed {
            operation: "status".to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            operation: "status".to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        return Err(GitError::DirtyWorkingTree);
    }

    Ok(())
}

/// Get the current branch name.
fn get_current_branch(repo: &Repository) -> Result<String, GitError> {
    let head = repo.head().map_err(GitError::HeadNotFound)?;

    if !head.is_branch() {
        return Err(GitError::DetachedHead);
    }

    head.shorthand()
        .map(String::from)
        .ok_or_else(|| GitError::CommandFailed {
            operation: "rev-parse".to_string(),
            stderr: "could not determine current branch".to_string(),
        })
}

/// Resolve the remote and branch to push to.
///
/// An explicit remote override wins; the branch then falls back from the
/// configured merge ref to the current branch name, so a repository without
/// tracking config can still be released with --remote.
fn resolve_tracking(
    repo: &Repository,
    current_branch: &str,
    remote_override: Option<&str>,
) -> Result<TrackingBranch, GitError> {
    if let Some(remote) = remote_override {
        let branch = configured_merge_branch(repo, current_branch)
            .unwrap_or_else(|| current_branch.to_string());
        return Ok(TrackingBranch {
            remote: remote.to_string(),
            branch,
        });
    }

    get_tracking_branch(repo, current_branch)
}

/// The branch name from `branch.<name>.merge`, if configured.
fn configured_merge_branch(repo: &Repository, current_branch: &str) -> Option<String> {
    let config = repo.config().ok()?;
    let merge_ref = config
        .get_string(&format!("branch.{}.merge", current_branch))
        .ok()?;
    let branch = merge_ref
        .strip_prefix("refs/heads/")
        .unwrap_or(&merge_ref)
        .to_string();
    (!branch.trim().is_empty()).then_some(branch)
}

/// Resolve tracked upstream for the current branch from git config.
fn get_tracking_branch(
    repo: &Repository,
    current_branch: &str,
) -> Result<TrackingBranch, GitError> {
    let config = repo.config().map_err(|e| GitError::CommandFailed {
        operation: "config".to_string(),
        stderr: e.to_string(),
    })?;

    let remote_key = format!("branch.{}.remote", current_branch);
    let merge_key = format!("branch.{}.merge", current_branch);

    let remote =
        config
            .get_string(&remote_key)
            .map_err(|_| GitError::MissingUpstreamTracking {
                branch: current_branch.to_string(),
            })?;
    let merge_ref =
        config
            .get_string(&merge_key)
            .map_err(|_| GitError::MissingUpstreamTracking {
                branch: current_branch.to_string(),
            })?;

    let branch = merge_ref
        .strip_prefix("refs/heads/")
        .unwrap_or(&merge_ref)
        .to_string();

    if remote.trim().is_empty() || branch.trim().is_empty() {
        return Err(GitError::MissingUpstreamTracking {
            branch: current_branch.to_string(),
        });
    }

    Ok(TrackingBranch { remote, branch })
}
