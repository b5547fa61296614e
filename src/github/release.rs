//! Release creation and asset upload.
//!
//! The release record is created through octocrab; the zip asset is then
//! uploaded to the release's upload URL over plain HTTP, since octocrab does
//! not cover the uploads endpoint. The upload is retried with exponential
//! backoff; the create call is not retried because it is not idempotent.

use std::path::Path;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use octocrab::Octocrab;
use tracing::{debug, warn};

use crate::error::GitHubError;

/// Upload retries: 3 attempts, base 1s, max 10s.
const MAX_RETRIES: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 10;

/// What to publish.
#[derive(Debug, Clone)]
pub struct ReleaseRequest<'a> {
    /// Tag name, e.g. `v1.4.3`. Created by GitHub on the default branch HEAD.
    pub tag: &'a str,
    /// Release title.
    pub title: &'a str,
    /// Release body text.
    pub body: &'a str,
}

/// A successfully published release.
#[derive(Debug, Clone)]
pub struct PublishedRelease {
    pub tag: String,
    pub html_url: String,
    pub asset_name: String,
}

/// Create a release and attach the artifact.
///
/// This is the main entry point that constructs the API clients.
pub async fn publish_release(
    token: &str,
    owner: &str,
    repo: &str,
    request: &ReleaseRequest<'_>,
    artifact: &Path,
) -> Result<PublishedRelease, GitHubError> {
    let octocrab = Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;
    let http = reqwest::Client::new();

    publish_release_with_clients(&octocrab, &http, Some(token), owner, repo, request, artifact)
        .await
}

/// Create a release and attach the artifact using pre-configured clients.
///
/// This allows dependency injection for testing with mock servers.
pub async fn publish_release_with_clients(
    octocrab: &Octocrab,
    http: &reqwest::Client,
    token: Option<&str>,
    owner: &str,
    repo: &str,
    request: &ReleaseRequest<'_>,
    artifact: &Path,
) -> Result<PublishedRelease, GitHubError> {
    let release = octocrab
        .repos(owner, repo)
        .releases()
        .create(request.tag)
        .name(request.title)
        .body(request.body)
        .send()
        .await
        .map_err(|e| GitHubError::CreateRelease {
            tag: request.tag.to_string(),
            source: Box::new(e),
        })?;

    debug!(tag = request.tag, "Created release");

    // upload_url is a URI template: .../assets{?name,label}
    let upload_url = release
        .upload_url
        .split('{')
        .next()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| GitHubError::MissingUploadUrl {
            tag: request.tag.to_string(),
        })?
        .to_string();

    let asset_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact.zip".to_string());

    let data = tokio::fs::read(artifact)
        .await
        .map_err(|e| GitHubError::ArtifactUnreadable {
            path: artifact.to_path_buf(),
            source: e,
        })?;

    upload_asset_with_retry(http, token, &upload_url, &asset_name, &data).await?;

    Ok(PublishedRelease {
        tag: request.tag.to_string(),
        html_url: release.html_url.to_string(),
        asset_name,
    })
}

/// Upload the asset, retrying transient failures with exponential backoff.
async fn upload_asset_with_retry(
    http: &reqwest::Client,
    token: Option<&str>,
    upload_url: &str,
    asset_name: &str,
    data: &[u8],
) -> Result<(), GitHubError> {
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        max_elapsed_time: None, // We control retries manually
        ..Default::default()
    };

    let mut attempts = 0;
    let mut last_error = None;

    while attempts < MAX_RETRIES {
        attempts += 1;

        match try_upload(http, token, upload_url, asset_name, data.to_vec()).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!(attempt = attempts, error = %e, "Asset upload failed");
                last_error = Some(e);

                if attempts < MAX_RETRIES {
                    if let Some(wait) = backoff.next_backoff() {
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| GitHubError::UploadAsset {
        name: asset_name.to_string(),
        reason: "all retry attempts failed".to_string(),
    }))
}

/// Single upload attempt.
async fn try_upload(
    http: &reqwest::Client,
    token: Option<&str>,
    upload_url: &str,
    asset_name: &str,
    data: Vec<u8>,
) -> Result<(), GitHubError> {
    let mut req = http
        .post(upload_url)
        .query(&[("name", asset_name)])
        .header(reqwest::header::CONTENT_TYPE, "application/zip")
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .body(data);

    if let Some(token) = token {
        req = req.bearer_auth(token);
    }

    let response = req.send().await.map_err(|e| GitHubError::UploadAsset {
        name: asset_name.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(GitHubError::UploadAsset {
            name: asset_name.to_string(),
            reason: format!("HTTP {}: {}", status, detail.trim()),
        });
    }

    Ok(())
}
