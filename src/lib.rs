//! haship - A CLI tool that automates patch releases for Home Assistant
//! custom integrations.
//!
//! # Overview
//!
//! haship reads the integration manifest under `custom_components/`, bumps
//! the patch component of its version, packages the component into a zip
//! artifact, commits and pushes the bump, and publishes a GitHub release
//! tagged `v<version>` with the artifact attached.

pub mod archive;
pub mod error;
pub mod git;
pub mod github;
pub mod manifest;
pub mod release;
pub mod version;

// Re-export commonly used types
pub use error::{
    ArchiveError, GitError, GitHubError, ManifestError, ReleaseError, VersionError,
};
pub use git::HeadCommit;
pub use github::{PublishedRelease, ReleaseRequest};
pub use manifest::Manifest;
pub use release::ReleaseConfig;
