//! Git operations for the release pipeline: commit, push, and rollback.
//!
//! All operations use `std::process::Command` to shell out to the system `git`
//! binary, inheriting the user's existing git config, SSH agent, and
//! credential store.

use std::path::PathBuf;
use std::process::Command;

use crate::error::GitError;

/// Stage the given files and create the release commit.
pub fn commit_release(message: &str, files: &[PathBuf]) -> Result<(), GitError> {
    let file_args: Vec<&str> = files.iter().filter_map(|p| p.to_str()).collect();
    if file_args.is_empty() {
        return Err(GitError::CommandFailed {
            operation: "add".to_string(),
            stderr: "no files to stage".to_string(),
        });
    }

    let mut add_args = vec!["add"];
    add_args.extend(file_args);

    run_git(&add_args, "add")?;
    run_git(&["commit", "-m", message], "commit")?;

    Ok(())
}

/// Push the release commit to the upstream branch.
pub fn push(remote: &str, branch: &str) -> Result<(), GitError> {
    run_git(&["push", remote, branch], "push")
}

/// Undo the release commit after a failed push.
///
/// Uses `--soft` reset so the version bump stays staged for inspection.
pub fn rollback() -> Result<(), GitError> {
    run_git(&["reset", "--soft", "HEAD~1"], "reset")
}

/// Run a git command and return success or a descriptive error.
fn run_git(args: &[&str], operation: &str) -> Result<(), GitError> {
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|e| GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_git_version_succeeds() {
        // git --version should always succeed
        let result = run_git(&["--version"], "version check");
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_git_invalid_command_fails() {
        let result = run_git(&["not-a-real-command"], "invalid");
        assert!(result.is_err());
    }

    #[test]
    fn test_commit_release_requires_files() {
        let result = commit_release("msg", &[]);
        assert!(result.is_err());
    }
}
