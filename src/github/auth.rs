//! GitHub token resolution.
//!
//! Publishing a release and uploading its asset both need an API token.
//! Resolution order: gh CLI login, then GITHUB_TOKEN, then GH_TOKEN.

use std::env;
use std::process::Command;

use crate::error::GitHubError;

/// Resolve a GitHub token for release publishing.
///
/// Prefers an active gh CLI login, then falls back to the GITHUB_TOKEN and
/// GH_TOKEN environment variables. Empty values are skipped.
pub fn get_github_token() -> Result<String, GitHubError> {
    if let Some(token) = gh_cli_token() {
        return Ok(token);
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.is_empty() {
                return Ok(token);
            }
        }
    }

    Err(GitHubError::AuthenticationFailed)
}

/// Token from an authenticated gh CLI, if one is logged in.
fn gh_cli_token() -> Option<String> {
    let status = Command::new("gh").args(["auth", "status"]).output().ok()?;
    if !status.status.success() {
        return None;
    }

    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
