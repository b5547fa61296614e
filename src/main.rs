//! haship - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use semver::Version;
use tracing_subscriber::EnvFilter;

use haship::release::{ReleaseConfig, run_release};
use haship::version::parse_version;

/// Automate patch releases for Home Assistant custom integrations.
#[derive(Parser, Debug)]
#[command(name = "haship")]
#[command(about = "Bump, package, and publish a Home Assistant custom integration release")]
#[command(version)]
struct Cli {
    /// Path to the integration manifest.json (auto-discovered under
    /// custom_components/ when omitted)
    #[arg(long)]
    component: Option<PathBuf>,

    /// Explicit version to release (overrides the patch bump)
    #[arg(long = "set-version", value_parser = parse_plain_version)]
    version: Option<Version>,

    /// Release body text. When omitted, the HEAD commit message is used
    #[arg(long)]
    notes: Option<String>,

    /// Artifact destination path
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Remote to push to (defaults to the branch's tracking remote)
    #[arg(long)]
    remote: Option<String>,

    /// Print the release plan without making changes
    #[arg(long)]
    dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Update the manifest and package the artifact, but do not commit,
    /// push, or publish
    #[arg(long)]
    no_push: bool,

    /// Commit and push, but skip the GitHub release
    #[arg(long)]
    no_publish: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ReleaseConfig {
        manifest_path: cli.component,
        set_version: cli.version,
        notes: cli.notes,
        output: cli.output,
        remote: cli.remote,
        dry_run: cli.dry_run,
        assume_yes: cli.yes,
        no_push: cli.no_push,
        no_publish: cli.no_publish,
    };

    run_release(config).await.context("Release failed")?;

    Ok(())
}

/// Parse `--set-version` with the same strict grammar the manifest enforces.
///
/// Manifest versions are plain `major.minor.patch`; an override must not be
/// able to smuggle pre-release or build metadata past that rule.
fn parse_plain_version(raw: &str) -> Result<Version, String> {
    parse_version(raw).map_err(|e| e.to_string())
}
