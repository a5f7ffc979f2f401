use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a tab. Allocated from a monotonically increasing counter and
/// never reused within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// Back/forward availability of a tab's surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// What the tab row shows in the icon slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "url", rename_all = "snake_case")]
pub enum FaviconState {
    /// No icon known.
    Placeholder,
    /// An icon URL was announced but the image has not loaded yet.
    Pending(String),
    /// The icon image loaded successfully.
    Loaded(String),
    /// The icon image failed to load. Not retried for the same URL.
    Failed(String),
}

/// UI-side projection of a single tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    /// Cached echo of the surface's URL.
    pub url: String,
    pub title: String,
    pub favicon: FaviconState,
    pub loading: bool,
    pub navigation: NavigationState,
    /// Set when the host could not create a surface for this tab.
    pub failed: bool,
}

impl Tab {
    pub fn new(id: TabId, url: &str) -> Self {
        Self {
            id,
            url: url.to_string(),
            title: String::new(),
            favicon: FaviconState::Placeholder,
            loading: true,
            navigation: NavigationState::default(),
            failed: false,
        }
    }

    /// Generated placeholder glyph: first character of the title, uppercased.
    pub fn placeholder_glyph(&self) -> Option<String> {
        self.title
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
    }

    /// True when the row should render the placeholder instead of an image.
    pub fn shows_placeholder(&self) -> bool {
        !matches!(self.favicon, FaviconState::Loaded(_))
    }
}
