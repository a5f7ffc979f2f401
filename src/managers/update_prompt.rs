//! UI-side state of the update affordance.

use crate::types::chrome::UpdateView;
use crate::types::message::UiEvent;
use crate::types::update::DownloadOutcome;

/// What a click on the update button should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    /// Fetch the artifact at this URL.
    Download(String),
    /// Nothing known yet; ask the host to check the feed.
    CheckForUpdate,
    /// A download is already running.
    None,
}

#[derive(Debug, Default)]
pub struct UpdatePrompt {
    download_url: Option<String>,
    version: Option<String>,
    downloading: bool,
    /// URL of the running download.
    in_flight: Option<String>,
    /// URL of the last download that completed.
    downloaded: Option<String>,
    last_outcome: Option<DownloadOutcome>,
}

impl UpdatePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// The button is only shown while a matching artifact is known.
    pub fn visible(&self) -> bool {
        self.download_url.is_some()
    }

    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    pub fn last_outcome(&self) -> Option<&DownloadOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn handle_event(&mut self, event: &UiEvent) {
        match event {
            UiEvent::UpdateAvailable { version, download_url } => {
                self.version = Some(version.clone());
                self.download_url = Some(download_url.clone());
            }
            UiEvent::UpdateNotAvailable => {
                self.version = None;
                self.download_url = None;
            }
            UiEvent::UpdateDownloadFinished { outcome } => {
                self.downloading = false;
                let url = self.in_flight.take();
                if outcome.is_success() {
                    self.downloaded = url;
                }
                self.last_outcome = Some(outcome.clone());
            }
            _ => {}
        }
    }

    /// Resolves a click on the update button.
    pub fn click(&mut self) -> PromptAction {
        if self.downloading {
            return PromptAction::None;
        }
        match &self.download_url {
            Some(url) => {
                let url = url.clone();
                self.download_started(&url);
                PromptAction::Download(url)
            }
            None => PromptAction::CheckForUpdate,
        }
    }

    /// Marks a download of `url` as running.
    pub fn download_started(&mut self, url: &str) {
        self.downloading = true;
        self.in_flight = Some(url.to_string());
        self.last_outcome = None;
    }

    /// Auto-download fetches each artifact once. Failed or canceled
    /// downloads are retried on the next report.
    pub fn should_auto_download(&self, url: &str) -> bool {
        !self.downloading && self.downloaded.as_deref() != Some(url)
    }

    pub fn view(&self) -> UpdateView {
        let message = self.last_outcome.as_ref().map(|outcome| match outcome {
            DownloadOutcome::Completed { path } => format!("Update downloaded to {}", path),
            DownloadOutcome::Failed { error } => format!("Download failed: {}", error),
            DownloadOutcome::Canceled => "Download canceled".to_string(),
        });
        UpdateView {
            visible: self.visible(),
            version: self.version.clone(),
            downloading: self.downloading,
            message,
        }
    }
}
