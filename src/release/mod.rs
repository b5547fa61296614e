//! Release pipeline: automate the full patch-release flow.
//!
//! Orchestrates preflight checks, the version bump, manifest rewrite,
//! artifact packaging, git commit/push, and GitHub release publishing.
//! Every step fails the whole run; nothing later executes after a failure.

pub mod executor;
pub mod preflight;

use std::path::PathBuf;

use dialoguer::Confirm;
use git2::Repository;
use semver::Version;
use tracing::debug;

use crate::archive::package_component;
use crate::error::{GitError, ReleaseError, VersionError};
use crate::git::tag_exists;
use crate::github::auth::get_github_token;
use crate::github::{ReleaseRequest, parse_github_remote, publish_release};
use crate::version::bump_patch;

use self::preflight::run_checks;

/// Configuration for the release command, derived from CLI flags.
pub struct ReleaseConfig {
    /// Explicit manifest path; auto-discovered when absent.
    pub manifest_path: Option<PathBuf>,
    /// Explicit next version, overriding the patch bump.
    pub set_version: Option<Version>,
    /// Release body text. Defaults to the HEAD commit message.
    pub notes: Option<String>,
    /// Artifact destination. Defaults to `<domain>-<version>.zip` in the
    /// system temp directory.
    pub output: Option<PathBuf>,
    /// Remote to push to, overriding the branch's tracking remote.
    pub remote: Option<String>,
    pub dry_run: bool,
    pub assume_yes: bool,
    pub no_push: bool,
    pub no_publish: bool,
}

/// Run the full release pipeline.
pub async fn run_release(config: ReleaseConfig) -> Result<(), ReleaseError> {
    let repo = Repository::open(".").map_err(GitError::OpenRepository)?;

    // ── Stage 1: Preflight checks ──
    println!("Preflight checks:");

    let preflight = run_checks(
        &repo,
        config.manifest_path.as_deref(),
        config.remote.as_deref(),
    )?;

    println!("  [PASS] Working tree is clean");
    println!(
        "  [PASS] Branch {} tracks {}/{}",
        preflight.current_branch, preflight.remote_name, preflight.upstream_branch
    );
    println!(
        "  [PASS] Component '{}' at version {}",
        preflight.manifest.domain, preflight.manifest.version
    );

    // ── Stage 2: Version selection ──
    let current = preflight.manifest.version.clone();
    let next = resolve_next_version(&current, config.set_version.clone())?;

    println!();
    println!("Version: {} -> {}", current, next);

    // ── Stage 3: Tag collision check ──
    let tag_name = format!("v{}", next);
    if tag_exists(&repo, &tag_name)? {
        return Err(ReleaseError::TagAlreadyExists(tag_name));
    }

    // ── Stage 4: Release notes ──
    // The HEAD commit message is the documented default; --notes overrides it.
    let notes = match config.notes.clone() {
        Some(text) => text,
        None => preflight.head.message.trim().to_string(),
    };

    let artifact_path = config.output.clone().unwrap_or_else(|| {
        std::env::temp_dir().join(format!("{}-{}.zip", preflight.manifest.domain, next))
    });

    // ── Stage 5: Summary and confirmation ──
    println!();
    println!("Summary:");
    println!("  Manifest:  {}", preflight.manifest.path.display());
    println!("  Artifact:  {}", artifact_path.display());
    println!("  Commit:    chore(release): {}", tag_name);
    if config.no_push {
        println!("  Push:      (skipped)");
    } else {
        println!(
            "  Push to:   {}/{}",
            preflight.remote_name, preflight.upstream_branch
        );
    }
    if config.no_publish || config.no_push {
        println!("  Release:   (skipped)");
    } else {
        println!("  Release:   {} \"{}\"", tag_name, preflight.head.summary);
    }

    if config.dry_run {
        println!();
        println!("Dry run complete. No changes made.");
        return Ok(());
    }

    if !config.assume_yes {
        println!();
        let confirmed = Confirm::new()
            .with_prompt("Proceed?")
            .default(true)
            .interact()
            .map_err(|e| ReleaseError::PromptFailed(e.to_string()))?;

        if !confirmed {
            return Err(ReleaseError::Cancelled);
        }
    }

    // ── Stage 6: Manifest rewrite ──
    let mut manifest = preflight.manifest;
    manifest.set_version(next.clone());
    manifest.save()?;
    println!("  [DONE] Updated {}", manifest.path.display());

    // ── Stage 7: Artifact packaging ──
    let size = package_component(manifest.component_dir(), &artifact_path)?;
    println!(
        "  [DONE] Packaged {} ({} bytes)",
        artifact_path.display(),
        size
    );

    // ── Stage 8: Commit and push ──
    let commit_message = format!("chore(release): {}", tag_name);

    if config.no_push {
        debug!("Skipping commit and push (--no-push)");
        println!("  [SKIP] Commit and push");
        println!();
        println!("Manifest updated and artifact packaged. Nothing was pushed.");
        return Ok(());
    }

    executor::commit_release(&commit_message, std::slice::from_ref(&manifest.path))?;
    println!("  [DONE] Created commit: {}", commit_message);

    if let Err(e) = executor::push(&preflight.remote_name, &preflight.upstream_branch) {
        // ── Rollback on push failure ──
        eprintln!("  [FAIL] {}", e);
        eprintln!("Rolling back release commit...");

        match executor::rollback() {
            Ok(()) => {
                eprintln!("  [DONE] Reset commit (bump left staged)");
                eprintln!("Release aborted. Fix the push issue and try again.");
            }
            Err(rollback_err) => {
                return Err(ReleaseError::RollbackFailed(format!(
                    "{} (manual cleanup: git reset --soft HEAD~1)",
                    rollback_err
                )));
            }
        }

        return Err(ReleaseError::PushFailed(e.to_string()));
    }
    println!(
        "  [DONE] Pushed to {}/{}",
        preflight.remote_name, preflight.upstream_branch
    );

    // ── Stage 9: GitHub release ──
    // The commit is already public at this point, so a publish failure is
    // surfaced as-is with no rollback.
    if config.no_publish {
        println!();
        println!("Pushed {}. GitHub release skipped (--no-publish).", tag_name);
        return Ok(());
    }

    let token = get_github_token()?;
    let (owner, repo_name) = remote_owner_repo(&repo, &preflight.remote_name)?;

    let request = ReleaseRequest {
        tag: &tag_name,
        title: &tag_name,
        body: &notes,
    };

    println!("  Publishing release {}...", tag_name);
    let published = publish_release(&token, &owner, &repo_name, &request, &artifact_path).await?;

    println!(
        "  [DONE] Published {} with asset {}",
        published.html_url, published.asset_name
    );
    println!();
    println!("Release {} shipped!", tag_name);

    Ok(())
}

/// Resolve the version to release.
///
/// An explicit override is held to the same plain `major.minor.patch` rule
/// as a parsed manifest version; otherwise the current version gets a patch
/// bump.
pub fn resolve_next_version(
    current: &Version,
    explicit: Option<Version>,
) -> Result<Version, VersionError> {
    match explicit {
        Some(version) => {
            if !version.pre.is_empty() || !version.build.is_empty() {
                return Err(VersionError::NotPlainRelease(version.to_string()));
            }
            Ok(version)
        }
        None => bump_patch(current),
    }
}

/// Resolve owner/repo from the tracked remote's URL.
fn remote_owner_repo(repo: &Repository, remote_name: &str) -> Result<(String, String), ReleaseError> {
    let remote = repo
        .find_remote(remote_name)
        .map_err(|e| GitError::CommandFailed {
            operation: "remote".to_string(),
            stderr: e.to_string(),
        })?;

    let url = remote.url().ok_or_else(|| GitError::CommandFailed {
        operation: "remote".to_string(),
        stderr: format!("remote '{}' has no URL", remote_name),
    })?;

    Ok(parse_github_remote(url)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_to_patch_bump() {
        let next = resolve_next_version(&Version::new(1, 4, 2), None).unwrap();
        assert_eq!(next, Version::new(1, 4, 3));
    }

    #[test]
    fn test_resolve_accepts_plain_override() {
        let explicit = Version::new(2, 0, 0);
        let next = resolve_next_version(&Version::new(1, 4, 2), Some(explicit.clone())).unwrap();
        assert_eq!(next, explicit);
    }

    #[test]
    fn test_resolve_rejects_pre_release_override() {
        // semver's own grammar would accept this; the manifest rule must not
        let explicit: Version = "1.2.3-beta.1".parse().unwrap();
        let result = resolve_next_version(&Version::new(1, 2, 2), Some(explicit));
        assert!(matches!(result, Err(VersionError::NotPlainRelease(_))));
    }

    #[test]
    fn test_resolve_rejects_build_metadata_override() {
        let explicit: Version = "1.2.3+build.5".parse().unwrap();
        let result = resolve_next_version(&Version::new(1, 2, 2), Some(explicit));
        assert!(matches!(result, Err(VersionError::NotPlainRelease(_))));
    }

    #[test]
    fn test_prompt_failure_is_distinct_from_cancellation() {
        let err = ReleaseError::PromptFailed("not a terminal".to_string());
        assert!(err.to_string().contains("not a terminal"));
        assert!(!matches!(err, ReleaseError::Cancelled));
    }
}
