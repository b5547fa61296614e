//! HEAD commit resolution.
//!
//! The HEAD commit message is the default release body, so it is captured in
//! full alongside the summary line used for display.

use chrono::{DateTime, TimeZone, Utc};
use git2::Repository;

use crate::error::GitError;

/// The commit at HEAD.
#[derive(Debug, Clone)]
pub struct HeadCommit {
    pub hash: String,
    /// First line of the message.
    pub summary: String,
    /// Full message, including body and footers.
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Resolve HEAD to its commit.
pub fn head_commit(repo: &Repository) -> Result<HeadCommit, GitError> {
    let head = repo.head().map_err(GitError::HeadNotFound)?;
    let commit = head.peel_to_commit().map_err(GitError::HeadNotFound)?;

    let message = commit.message().unwrap_or("").to_string();
    let summary = message.lines().next().unwrap_or("").to_string();

    let time = commit.time();
    let timestamp = Utc
        .timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    Ok(HeadCommit {
        hash: commit.id().to_string(),
        summary,
        message,
        timestamp,
    })
}
