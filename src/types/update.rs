use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating system the shell is running on, as far as updates are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other(String),
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other(std::env::consts::OS.to_string())
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::MacOs => write!(f, "darwin"),
            Platform::Windows => write!(f, "win32"),
            Platform::Linux => write!(f, "linux"),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}

/// One downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// File name, e.g. `TabShell-1.2.0.dmg`.
    pub name: String,
    /// Absolute download URL, or a bare file name relative to the release.
    pub url: String,
}

/// The latest release as reported by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFeed {
    pub version: String,
    pub artifacts: Vec<ArtifactDescriptor>,
}

/// Result of evaluating a release against the running binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Available { version: String, download_url: String },
    NotAvailable,
}

/// How an available update is acted upon. The two modes are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Show the update affordance and wait for the user to trigger the download.
    #[default]
    Manual,
    /// Download as soon as a matching artifact is found.
    AutoDownload,
}

/// Outcome of an artifact download request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    Completed { path: String },
    Failed { error: String },
    Canceled,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Completed { .. })
    }
}
