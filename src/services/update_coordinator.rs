//! Update coordinator.
//!
//! Reads the latest release from the GitHub Releases API, picks the artifact
//! that matches the running platform and downloads it on request. Network and
//! disk work is async; results are reported back as [`UiEvent`]s.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::platform;
use crate::types::config::UpdateSettings;
use crate::types::errors::UpdateError;
use crate::types::message::UiEvent;
use crate::types::update::{
    ArtifactDescriptor, DownloadOutcome, Platform, ReleaseFeed, UpdateMode, UpdateStatus,
};

#[derive(Deserialize)]
struct GithubRelease {
    tag_name: String,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Deserialize)]
struct GithubAsset {
    name: String,
    browser_download_url: String,
}

/// Parses a `releases/latest` response body.
pub fn parse_release_feed(body: &str) -> Result<ReleaseFeed, UpdateError> {
    let release: GithubRelease = serde_json::from_str(body)
        .map_err(|e| UpdateError::Parse(format!("Failed to parse release: {}", e)))?;
    let version = release.tag_name.trim_start_matches('v').to_string();
    if version.is_empty() {
        return Err(UpdateError::Parse("Release has no tag".to_string()));
    }
    let artifacts = release
        .assets
        .into_iter()
        .map(|asset| ArtifactDescriptor {
            name: asset.name,
            url: asset.browser_download_url,
        })
        .collect();
    Ok(ReleaseFeed { version, artifacts })
}

/// True when `latest` is a strictly higher dotted version than `current`.
/// A leading `v` on either side is ignored.
pub fn is_newer_version(current: &str, latest: &str) -> bool {
    let parse = |v: &str| -> Vec<u32> {
        v.trim()
            .trim_start_matches('v')
            .split('.')
            .map(|part| {
                part.chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
                    .parse()
                    .unwrap_or(0)
            })
            .collect()
    };
    let mut c = parse(current);
    let mut l = parse(latest);
    let len = c.len().max(l.len());
    c.resize(len, 0);
    l.resize(len, 0);
    l > c
}

fn extensions_for(platform: &Platform) -> Option<&'static [&'static str]> {
    match platform {
        Platform::MacOs => Some(&[".dmg", ".zip"]),
        Platform::Windows => Some(&[".exe", ".msi"]),
        Platform::Linux | Platform::Other(_) => None,
    }
}

/// Picks the artifact for `platform`. Extensions are tried in preference
/// order, so a `.dmg` wins over a `.zip` regardless of feed order.
pub fn select_artifact<'a>(
    platform: &Platform,
    artifacts: &'a [ArtifactDescriptor],
) -> Result<Option<&'a ArtifactDescriptor>, UpdateError> {
    let extensions =
        extensions_for(platform).ok_or_else(|| UpdateError::UnsupportedPlatform(platform.to_string()))?;
    Ok(extensions.iter().find_map(|ext| {
        artifacts.iter().find(|artifact| {
            let name = if artifact.name.is_empty() { &artifact.url } else { &artifact.name };
            name.to_lowercase().ends_with(ext)
        })
    }))
}

/// Absolute URLs are used as-is; bare file names are resolved against the
/// release download path of the tagged version.
pub fn build_download_url(owner: &str, repo: &str, version: &str, artifact: &ArtifactDescriptor) -> String {
    if artifact.url.starts_with("https://") || artifact.url.starts_with("http://") {
        return artifact.url.clone();
    }
    let file = if artifact.url.is_empty() { &artifact.name } else { &artifact.url };
    format!(
        "https://github.com/{}/{}/releases/download/v{}/{}",
        owner,
        repo,
        version.trim_start_matches('v'),
        file.trim_start_matches('/')
    )
}

/// Last path segment of `url`, without query or fragment.
pub fn artifact_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .map(str::trim)
        .find(|segment| !segment.is_empty() && !segment.contains(':'))
        .unwrap_or("update")
        .to_string()
}

impl UpdateStatus {
    pub fn into_event(self) -> UiEvent {
        match self {
            UpdateStatus::Available { version, download_url } => {
                UiEvent::UpdateAvailable { version, download_url }
            }
            UpdateStatus::NotAvailable => UiEvent::UpdateNotAvailable,
        }
    }
}

/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct UpdateCoordinator {
    client: reqwest::Client,
    settings: UpdateSettings,
    platform: Platform,
    current_version: String,
}

impl UpdateCoordinator {
    pub fn new(settings: UpdateSettings) -> Self {
        Self::with_platform(settings, Platform::current(), env!("CARGO_PKG_VERSION"))
    }

    pub fn with_platform(settings: UpdateSettings, platform: Platform, current_version: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!("tabshell/{}", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            client,
            settings,
            platform,
            current_version: current_version.to_string(),
        }
    }

    pub fn settings(&self) -> &UpdateSettings {
        &self.settings
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn auto_download(&self) -> bool {
        self.settings.mode == UpdateMode::AutoDownload
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.settings.check_interval_secs.max(1))
    }

    pub fn feed_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.owner,
            self.settings.repo
        )
    }

    /// Decides whether `feed` offers an installable update for this binary.
    pub fn evaluate(&self, feed: &ReleaseFeed) -> UpdateStatus {
        if !is_newer_version(&self.current_version, &feed.version) {
            debug!(current = %self.current_version, latest = %feed.version, "already up to date");
            return UpdateStatus::NotAvailable;
        }
        match select_artifact(&self.platform, &feed.artifacts) {
            Ok(Some(artifact)) => {
                let download_url =
                    build_download_url(&self.settings.owner, &self.settings.repo, &feed.version, artifact);
                info!(version = %feed.version, url = %download_url, "update available");
                UpdateStatus::Available {
                    version: feed.version.clone(),
                    download_url,
                }
            }
            Ok(None) => {
                warn!(version = %feed.version, platform = %self.platform, "release has no matching artifact");
                UpdateStatus::NotAvailable
            }
            Err(e) => {
                warn!(error = %e, "update check skipped");
                UpdateStatus::NotAvailable
            }
        }
    }

    pub async fn fetch_feed(&self) -> Result<ReleaseFeed, UpdateError> {
        let response = self
            .client
            .get(self.feed_url())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| UpdateError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Network(format!("Release feed returned {}", status)));
        }
        let body = response
            .text()
            .await
            .map_err(|e| UpdateError::Network(e.to_string()))?;
        parse_release_feed(&body)
    }

    /// One full check. Failures are logged and reported as "not available".
    pub async fn check(&self) -> UpdateStatus {
        if !self.settings.is_configured() {
            debug!("update feed not configured");
            return UpdateStatus::NotAvailable;
        }
        match self.fetch_feed().await {
            Ok(feed) => self.evaluate(&feed),
            Err(e) => {
                warn!(error = %e, url = %self.feed_url(), "update check failed");
                UpdateStatus::NotAvailable
            }
        }
    }

    /// Checks immediately, then on every interval tick, until `notify`
    /// reports that nobody is listening anymore.
    pub async fn run_periodic<N>(self, mut notify: N)
    where
        N: FnMut(UpdateStatus) -> bool,
    {
        let mut ticker = tokio::time::interval(self.check_interval());
        loop {
            ticker.tick().await;
            let status = self.check().await;
            if !notify(status) {
                debug!("update listener gone, stopping periodic checks");
                break;
            }
        }
    }

    /// Downloads into the platform's default download directory.
    pub async fn download(&self, url: &str, cancel: watch::Receiver<bool>) -> DownloadOutcome {
        self.download_to(url, &platform::get_download_dir(), cancel).await
    }

    /// Streams `url` into `dest_dir`. Bytes land in a `.part` file that is
    /// renamed over the final name only once the download completed, so a
    /// failed or canceled download never touches an existing file.
    pub async fn download_to(
        &self,
        url: &str,
        dest_dir: &Path,
        mut cancel: watch::Receiver<bool>,
    ) -> DownloadOutcome {
        if *cancel.borrow() {
            return DownloadOutcome::Canceled;
        }
        let file_name = artifact_file_name(url);
        let path = dest_dir.join(&file_name);
        let part = dest_dir.join(format!("{}.part", file_name));
        info!(url, path = %path.display(), "downloading update");
        let result = match self.fetch_to(url, &part, &mut cancel).await {
            Ok(true) => tokio::fs::rename(&part, &path)
                .await
                .map(|_| true)
                .map_err(|e| UpdateError::Io(format!("Failed to move {}: {}", part.display(), e))),
            other => other,
        };
        match result {
            Ok(true) => {
                info!(path = %path.display(), "update downloaded");
                DownloadOutcome::Completed {
                    path: path.to_string_lossy().to_string(),
                }
            }
            Ok(false) => {
                remove_partial(&part).await;
                info!("update download canceled");
                DownloadOutcome::Canceled
            }
            Err(e) => {
                remove_partial(&part).await;
                warn!(error = %e, "update download failed");
                DownloadOutcome::Failed { error: e.to_string() }
            }
        }
    }

    /// Returns `Ok(false)` when canceled.
    async fn fetch_to(
        &self,
        url: &str,
        path: &Path,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<bool, UpdateError> {
        let response = tokio::select! {
            response = self.client.get(url).send() => {
                response.map_err(|e| UpdateError::Network(e.to_string()))?
            }
            _ = canceled(cancel) => return Ok(false),
        };
        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Network(format!("Download returned {}", status)));
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| UpdateError::Io(format!("Failed to create {}: {}", parent.display(), e)))?;
        }
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| UpdateError::Io(format!("Failed to create {}: {}", path.display(), e)))?;

        let mut stream = response.bytes_stream();
        loop {
            tokio::select! {
                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => file
                        .write_all(&bytes)
                        .await
                        .map_err(|e| UpdateError::Io(e.to_string()))?,
                    Some(Err(e)) => return Err(UpdateError::Network(e.to_string())),
                    None => break,
                },
                _ = canceled(cancel) => return Ok(false),
            }
        }
        file.flush().await.map_err(|e| UpdateError::Io(e.to_string()))?;
        Ok(true)
    }
}

/// Resolves once the cancel flag is raised. Never resolves if the sender is
/// dropped without canceling.
async fn canceled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn remove_partial(path: &Path) {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(error = %e, path = %path.display(), "failed to remove partial download");
        }
    }
}
