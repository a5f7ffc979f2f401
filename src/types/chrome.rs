use serde::{Deserialize, Serialize};

use super::tab::{FaviconState, TabId};

/// Everything the chrome web view needs to draw itself. Serialized and pushed
/// to the chrome after every state change; the chrome holds no state of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeView {
    pub tabs: Vec<TabView>,
    pub active_id: Option<TabId>,
    pub url_bar: String,
    pub back_enabled: bool,
    pub forward_enabled: bool,
    pub tab_bar_visible: bool,
    pub update: UpdateView,
    pub window: WindowView,
}

/// One row of the tab bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabView {
    pub id: TabId,
    pub title: String,
    pub placeholder: Option<String>,
    pub show_placeholder: bool,
    pub favicon: FaviconState,
    pub loading: bool,
    pub active: bool,
    pub failed: bool,
    pub width_percent: f32,
}

/// Native window state the chrome mirrors: the maximize button turns into
/// restore, and fullscreen hides the window controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowView {
    pub maximized: bool,
    pub fullscreen: bool,
}

/// State of the update affordance in the toolbar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateView {
    pub visible: bool,
    pub version: Option<String>,
    pub downloading: bool,
    pub message: Option<String>,
}
