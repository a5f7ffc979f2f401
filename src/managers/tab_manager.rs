use std::collections::HashMap;

use tracing::debug;

use crate::types::chrome::TabView;
use crate::types::message::{HostCommand, NavigationAction, UiEvent};
use crate::types::tab::{FaviconState, NavigationState, Tab, TabId};

/// Trait defining the UI-side tab management interface.
pub trait TabManagerTrait {
    fn initialize(&mut self) -> Option<TabId>;
    fn create_tab(&mut self, url: Option<&str>) -> TabId;
    fn close_tab(&mut self, tab_id: TabId) -> bool;
    fn switch_to_tab(&mut self, tab_id: TabId) -> bool;
    fn navigate(&mut self, action: NavigationAction) -> bool;
    fn navigate_to(&mut self, input: &str) -> bool;
    fn open_devtools(&mut self) -> bool;
    fn handle_event(&mut self, event: &UiEvent);
    fn favicon_loaded(&mut self, tab_id: TabId, icon_url: &str);
    fn favicon_failed(&mut self, tab_id: TabId, icon_url: &str);
    fn set_chrome_metrics(&mut self, toolbar_height: u32, tab_bar_height: u32);
    fn get_tab(&self, tab_id: TabId) -> Option<&Tab>;
    fn get_all_tabs(&self) -> Vec<&Tab>;
    fn get_active_tab(&self) -> Option<&Tab>;
    fn tab_count(&self) -> usize;
    fn get_tab_order(&self) -> &[TabId];
    fn drain_commands(&mut self) -> Vec<HostCommand>;
}

/// Rendered heights of the toolbar and the tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeMetrics {
    pub toolbar_height: u32,
    pub tab_bar_height: u32,
}

/// Title arrival is taken as the signal that a tab's content is meaningful,
/// so it clears the loading indicator even though resources may still be
/// loading. This is a UX heuristic, not a load-completion event.
pub fn loading_cleared_on_first_title(tab: &mut Tab) {
    tab.loading = false;
}

/// Turns URL bar input into an absolute URL. Input without an `http://` or
/// `https://` scheme gets `https://` prepended. Blank input yields `None`.
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Some(trimmed.to_string());
    }
    Some(format!("https://{}", trimmed))
}

/// UI-side projection of the tab collection.
///
/// Holds the visual tab rows, the active-tab pointer and the toolbar state.
/// User actions queue commands for the host; host events update the rows.
/// Once initialized the collection is never empty and exactly one tab is
/// active.
pub struct TabManager {
    tabs: HashMap<TabId, Tab>,
    tab_order: Vec<TabId>,
    active_tab_id: Option<TabId>,
    tab_counter: u64,
    home_url: String,
    url_bar: String,
    navigation: NavigationState,
    metrics: ChromeMetrics,
    last_offset: Option<u32>,
    outbox: Vec<HostCommand>,
}

impl TabManager {
    pub fn new(home_url: &str, metrics: ChromeMetrics) -> Self {
        Self {
            tabs: HashMap::new(),
            tab_order: Vec::new(),
            active_tab_id: None,
            tab_counter: 0,
            home_url: home_url.to_string(),
            url_bar: String::new(),
            navigation: NavigationState::default(),
            metrics,
            last_offset: None,
            outbox: Vec::new(),
        }
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    pub fn url_bar(&self) -> &str {
        &self.url_bar
    }

    /// Back/forward button enablement for the active tab.
    pub fn navigation(&self) -> NavigationState {
        self.navigation
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    /// The tab bar is hidden while there is at most one tab.
    pub fn tab_bar_visible(&self) -> bool {
        self.tabs.len() > 1
    }

    /// Vertical space reserved above the surfaces.
    pub fn chrome_offset(&self) -> u32 {
        if self.tab_bar_visible() {
            self.metrics.toolbar_height + self.metrics.tab_bar_height
        } else {
            self.metrics.toolbar_height
        }
    }

    /// Tab rows are evenly width-divided when the tab bar is shown.
    pub fn tab_width_percent(&self) -> f32 {
        if self.tab_bar_visible() {
            100.0 / self.tabs.len() as f32
        } else {
            100.0
        }
    }

    /// Rows in display order, ready for rendering.
    pub fn tab_views(&self) -> Vec<TabView> {
        let width = self.tab_width_percent();
        self.get_all_tabs()
            .into_iter()
            .map(|tab| TabView {
                id: tab.id,
                title: tab.title.clone(),
                placeholder: tab.placeholder_glyph(),
                show_placeholder: tab.shows_placeholder(),
                favicon: tab.favicon.clone(),
                loading: tab.loading,
                active: Some(tab.id) == self.active_tab_id,
                failed: tab.failed,
                width_percent: width,
            })
            .collect()
    }

    fn next_tab_id(&mut self) -> TabId {
        let id = TabId(self.tab_counter);
        self.tab_counter += 1;
        id
    }

    /// Recomputes the chrome offset after the tab count or metrics changed
    /// and tells the host when it moved.
    fn update_tab_bar(&mut self) {
        let offset = self.chrome_offset();
        if self.last_offset != Some(offset) {
            self.last_offset = Some(offset);
            self.outbox.push(HostCommand::UpdateViewPosition { offset_pixels: offset });
        }
    }

    fn clear_toolbar(&mut self) {
        self.url_bar.clear();
        self.navigation = NavigationState::default();
    }

    fn apply_title(tab: &mut Tab, title: &str) {
        tab.title = title.to_string();
        loading_cleared_on_first_title(tab);
    }

    fn apply_favicon(tab: &mut Tab, icon_url: Option<&str>) {
        match icon_url {
            Some(url) => {
                let known = matches!(
                    &tab.favicon,
                    FaviconState::Pending(u) | FaviconState::Loaded(u) | FaviconState::Failed(u) if u == url
                );
                if !known {
                    tab.favicon = FaviconState::Pending(url.to_string());
                }
            }
            None => {
                tab.favicon = FaviconState::Placeholder;
                tab.loading = false;
            }
        }
    }

    fn handle_creation_failed(&mut self, tab_id: TabId) {
        if !self.tabs.contains_key(&tab_id) {
            return;
        }
        if self.tabs.len() > 1 {
            self.close_tab(tab_id);
        } else if let Some(tab) = self.tabs.get_mut(&tab_id) {
            tab.failed = true;
            tab.loading = false;
        }
    }
}

impl TabManagerTrait for TabManager {
    /// Creates the first tab on the home URL. No-op when tabs already exist.
    fn initialize(&mut self) -> Option<TabId> {
        if !self.tabs.is_empty() {
            return None;
        }
        Some(self.create_tab(None))
    }

    /// Creates a tab, asks the host for its surface and makes it active.
    fn create_tab(&mut self, url: Option<&str>) -> TabId {
        let id = self.next_tab_id();
        let url = url.unwrap_or(self.home_url.as_str()).to_string();
        self.tabs.insert(id, Tab::new(id, &url));
        self.tab_order.push(id);
        self.outbox.push(HostCommand::CreateTab { tab_id: id, url });
        self.switch_to_tab(id);
        self.update_tab_bar();
        id
    }

    /// Closes a tab. The first remaining tab becomes active if the closed one
    /// was active; closing the last tab opens a fresh default tab.
    fn close_tab(&mut self, tab_id: TabId) -> bool {
        if self.tabs.remove(&tab_id).is_none() {
            return false;
        }
        self.tab_order.retain(|id| *id != tab_id);
        self.outbox.push(HostCommand::CloseTab { tab_id });

        if self.active_tab_id == Some(tab_id) {
            self.active_tab_id = None;
            match self.tab_order.first().copied() {
                Some(first) => {
                    self.switch_to_tab(first);
                }
                None => self.clear_toolbar(),
            }
        }

        if self.tabs.is_empty() {
            self.create_tab(None);
        }
        self.update_tab_bar();
        true
    }

    /// Moves the active pointer. The URL bar is left alone until the host
    /// re-announces the tab's navigation state.
    fn switch_to_tab(&mut self, tab_id: TabId) -> bool {
        if self.active_tab_id == Some(tab_id) || !self.tabs.contains_key(&tab_id) {
            return false;
        }
        self.active_tab_id = Some(tab_id);
        self.outbox.push(HostCommand::SwitchTab { tab_id });
        true
    }

    /// Forwards a navigation action to the active tab.
    fn navigate(&mut self, action: NavigationAction) -> bool {
        let Some(tab_id) = self.active_tab_id else {
            return false;
        };
        self.outbox.push(HostCommand::Navigate { tab_id, action });
        true
    }

    fn navigate_to(&mut self, input: &str) -> bool {
        match normalize_url(input) {
            Some(url) => self.navigate(NavigationAction::Url(url)),
            None => false,
        }
    }

    fn open_devtools(&mut self) -> bool {
        let Some(tab_id) = self.active_tab_id else {
            return false;
        };
        self.outbox.push(HostCommand::OpenDevTools { tab_id });
        true
    }

    /// Applies a host event. Events for tabs that are gone are dropped.
    fn handle_event(&mut self, event: &UiEvent) {
        if let Some(tab_id) = event.tab_id() {
            if !self.tabs.contains_key(&tab_id) {
                debug!(%tab_id, "event for closed tab dropped");
                return;
            }
        }
        let is_active = event.tab_id().is_some() && event.tab_id() == self.active_tab_id;

        match event {
            UiEvent::UrlChanged { tab_id, url } => {
                if let Some(tab) = self.tabs.get_mut(tab_id) {
                    tab.url = url.clone();
                }
                if is_active {
                    self.url_bar = url.clone();
                }
            }
            UiEvent::NavigationStateChanged { tab_id, can_go_back, can_go_forward } => {
                let state = NavigationState {
                    can_go_back: *can_go_back,
                    can_go_forward: *can_go_forward,
                };
                if let Some(tab) = self.tabs.get_mut(tab_id) {
                    tab.navigation = state;
                }
                if is_active {
                    self.navigation = state;
                }
            }
            UiEvent::TitleChanged { tab_id, title } => {
                if let Some(tab) = self.tabs.get_mut(tab_id) {
                    Self::apply_title(tab, title);
                }
            }
            UiEvent::FaviconChanged { tab_id, icon_url } => {
                if let Some(tab) = self.tabs.get_mut(tab_id) {
                    Self::apply_favicon(tab, icon_url.as_deref());
                }
            }
            UiEvent::NewTabRequested { url } => {
                self.create_tab(Some(url.as_str()));
            }
            UiEvent::TabCreationFailed { tab_id } => self.handle_creation_failed(*tab_id),
            UiEvent::UpdateAvailable { .. }
            | UiEvent::UpdateNotAvailable
            | UiEvent::UpdateDownloadFinished { .. } => {}
        }
    }

    /// The chrome finished loading an icon image.
    fn favicon_loaded(&mut self, tab_id: TabId, icon_url: &str) {
        if let Some(tab) = self.tabs.get_mut(&tab_id) {
            if matches!(&tab.favicon, FaviconState::Pending(u) if u == icon_url) {
                tab.favicon = FaviconState::Loaded(icon_url.to_string());
                tab.loading = false;
            }
        }
    }

    /// The chrome failed to load an icon image; fall back to the placeholder.
    fn favicon_failed(&mut self, tab_id: TabId, icon_url: &str) {
        if let Some(tab) = self.tabs.get_mut(&tab_id) {
            if matches!(&tab.favicon, FaviconState::Pending(u) | FaviconState::Loaded(u) if u == icon_url) {
                tab.favicon = FaviconState::Failed(icon_url.to_string());
                tab.loading = false;
            }
        }
    }

    fn set_chrome_metrics(&mut self, toolbar_height: u32, tab_bar_height: u32) {
        self.metrics = ChromeMetrics { toolbar_height, tab_bar_height };
        self.update_tab_bar();
    }

    fn get_tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.get(&tab_id)
    }

    fn get_all_tabs(&self) -> Vec<&Tab> {
        self.tab_order
            .iter()
            .filter_map(|id| self.tabs.get(id))
            .collect()
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.tabs.get(&id))
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn get_tab_order(&self) -> &[TabId] {
        &self.tab_order
    }

    fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.outbox)
    }
}
