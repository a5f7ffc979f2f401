//! Wire contract between the UI layer and the host.
//!
//! Commands flow UI → host and are fire-and-forget. Events flow host → UI and
//! are tagged with the tab they concern; the UI drops events for tabs it no
//! longer knows.

use serde::{Deserialize, Serialize};

use super::tab::TabId;
use super::update::DownloadOutcome;

/// A navigation request for a tab's surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NavigationAction {
    Back,
    Forward,
    Reload,
    Home,
    /// Absolute URL to load.
    Url(String),
}

impl From<String> for NavigationAction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "back" => NavigationAction::Back,
            "forward" => NavigationAction::Forward,
            "reload" => NavigationAction::Reload,
            "home" => NavigationAction::Home,
            _ => NavigationAction::Url(value),
        }
    }
}

impl From<NavigationAction> for String {
    fn from(action: NavigationAction) -> Self {
        match action {
            NavigationAction::Back => "back".to_string(),
            NavigationAction::Forward => "forward".to_string(),
            NavigationAction::Reload => "reload".to_string(),
            NavigationAction::Home => "home".to_string(),
            NavigationAction::Url(url) => url,
        }
    }
}

/// UI → host commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCommand {
    CreateTab { tab_id: TabId, url: String },
    SwitchTab { tab_id: TabId },
    CloseTab { tab_id: TabId },
    Navigate { tab_id: TabId, action: NavigationAction },
    UpdateViewPosition { offset_pixels: u32 },
    OpenDevTools { tab_id: TabId },
}

/// Host → UI events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UiEvent {
    UrlChanged {
        tab_id: TabId,
        url: String,
    },
    #[serde(rename = "navigationState")]
    NavigationStateChanged {
        tab_id: TabId,
        can_go_back: bool,
        can_go_forward: bool,
    },
    TitleChanged {
        tab_id: TabId,
        title: String,
    },
    FaviconChanged {
        tab_id: TabId,
        icon_url: Option<String>,
    },
    NewTabRequested {
        url: String,
    },
    TabCreationFailed {
        tab_id: TabId,
    },
    UpdateAvailable {
        version: String,
        download_url: String,
    },
    UpdateNotAvailable,
    UpdateDownloadFinished {
        outcome: DownloadOutcome,
    },
}

impl UiEvent {
    /// The tab an event is addressed to, if any.
    pub fn tab_id(&self) -> Option<TabId> {
        match self {
            UiEvent::UrlChanged { tab_id, .. }
            | UiEvent::NavigationStateChanged { tab_id, .. }
            | UiEvent::TitleChanged { tab_id, .. }
            | UiEvent::FaviconChanged { tab_id, .. }
            | UiEvent::TabCreationFailed { tab_id } => Some(*tab_id),
            _ => None,
        }
    }
}
