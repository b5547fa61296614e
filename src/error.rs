//! Error types for haship modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from version parsing and bumping.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error(
        "Invalid version '{raw}': {reason}. Expected '<major>.<minor>.<patch>' with plain non-negative integers"
    )]
    ParseFailed { raw: String, reason: String },

    #[error("Version '{0}' carries pre-release or build metadata, which is not supported")]
    NotPlainRelease(String),

    #[error("Patch component of '{0}' cannot be incremented without overflowing")]
    PatchOverflow(semver::Version),
}

/// Errors from manifest operations.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest not found at {0}")]
    NotFound(PathBuf),

    #[error("No custom_components/<domain>/manifest.json found under {0}")]
    NoComponent(PathBuf),

    #[error("Multiple components found ({domains}). Select one with --component")]
    AmbiguousComponent { domains: String },

    #[error("Failed to read manifest {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest {path} is not valid JSON: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest {0} has no 'version' field")]
    MissingVersion(PathBuf),

    #[error("Manifest {path}: {source}")]
    Version {
        path: PathBuf,
        #[source]
        source: VersionError,
    },
}

/// Errors from artifact packaging.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Component directory not found: {0}")]
    ComponentMissing(PathBuf),

    #[error("Failed to walk component directory: {0}")]
    WalkFailed(#[source] walkdir::Error),

    #[error("I/O error while packaging {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write zip archive: {0}")]
    ZipFailed(#[source] zip::result::ZipError),

    #[error("Component directory {0} contains no files")]
    EmptyComponent(PathBuf),
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Could not resolve HEAD commit: {0}")]
    HeadNotFound(#[source] git2::Error),

    #[error("Failed to enumerate tags: {0}")]
    TagLookup(#[source] git2::Error),

    #[error("git binary not found in PATH")]
    GitNotInstalled,

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("Working tree has uncommitted changes. Commit or stash them first")]
    DirtyWorkingTree,

    #[error("HEAD is detached. Check out a branch before releasing")]
    DetachedHead,

    #[error(
        "Branch '{branch}' has no upstream tracking branch. Run 'git push -u <remote> {branch}' first"
    )]
    MissingUpstreamTracking { branch: String },
}

/// Errors from GitHub release publishing.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to parse repository URL")]
    InvalidRepositoryUrl,

    #[error("Failed to build GitHub client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("Failed to create release {tag}: {source}")]
    CreateRelease {
        tag: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Release {tag} has no usable asset upload URL")]
    MissingUploadUrl { tag: String },

    #[error("Failed to upload asset '{name}': {reason}")]
    UploadAsset { name: String, reason: String },

    #[error("Failed to read artifact {path}: {source}")]
    ArtifactUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the release pipeline.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("Tag {0} already exists. This version was likely already released")]
    TagAlreadyExists(String),

    #[error("Push failed: {0}")]
    PushFailed(String),

    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    #[error("Failed to read confirmation prompt: {0}")]
    PromptFailed(String),

    #[error("Release cancelled")]
    Cancelled,
}
