//! Shell core for TabShell.
//!
//! Central struct tying the UI-side tab projection to the host. The two sides
//! only talk through queued [`HostCommand`]s and [`UiEvent`]s; `pump` moves
//! both queues in FIFO order until they are empty.

use tracing::{debug, warn};

use crate::ipc_handler::ChromeIntent;
use crate::managers::tab_manager::{normalize_url, ChromeMetrics, TabManager, TabManagerTrait};
use crate::managers::update_prompt::{PromptAction, UpdatePrompt};
use crate::services::shell_host::ShellHost;
use crate::surface::{SurfaceEvent, SurfaceFactory};
use crate::types::chrome::{ChromeView, WindowView};
use crate::types::config::ShellConfig;
use crate::types::geometry::WindowSize;
use crate::types::message::UiEvent;
use crate::types::update::UpdateMode;

/// Work the shell cannot do itself and hands to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    Minimize,
    ToggleMaximize,
    CloseWindow,
    DragWindow,
    OpenExternal(String),
    StartDownload(String),
    CheckForUpdate,
    CancelDownload,
}

pub struct Shell<F: SurfaceFactory> {
    host: ShellHost<F>,
    tabs: TabManager,
    update: UpdatePrompt,
    devtools: bool,
    auto_download: bool,
    window: WindowView,
}

impl<F: SurfaceFactory> Shell<F> {
    pub fn new(factory: F, config: &ShellConfig, window: WindowSize) -> Self {
        let metrics = ChromeMetrics {
            toolbar_height: config.chrome.toolbar_height,
            tab_bar_height: config.chrome.tab_bar_height,
        };
        Self {
            host: ShellHost::new(factory, window, config.chrome.initial_offset, &config.home_url),
            tabs: TabManager::new(&config.home_url, metrics),
            update: UpdatePrompt::new(),
            devtools: config.devtools,
            auto_download: config.update.mode == UpdateMode::AutoDownload,
            window: WindowView::default(),
        }
    }

    pub fn host(&self) -> &ShellHost<F> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut ShellHost<F> {
        &mut self.host
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn update_prompt(&self) -> &UpdatePrompt {
        &self.update
    }

    /// Opens the initial tab on the home URL.
    pub fn start(&mut self) -> Vec<ShellAction> {
        self.tabs.initialize();
        self.pump()
    }

    /// Applies a chrome intent and runs the resulting command/event exchange.
    pub fn handle_intent(&mut self, intent: ChromeIntent) -> Vec<ShellAction> {
        debug!(?intent, "chrome intent");
        let mut actions = Vec::new();
        match intent {
            ChromeIntent::Ready => {}
            ChromeIntent::NewTab { url } => {
                let url = url.as_deref().and_then(normalize_url);
                self.tabs.create_tab(url.as_deref());
            }
            ChromeIntent::SwitchTab(tab_id) => {
                self.tabs.switch_to_tab(tab_id);
            }
            ChromeIntent::CloseTab(tab_id) => {
                self.tabs.close_tab(tab_id);
            }
            ChromeIntent::Navigate(action) => {
                self.tabs.navigate(action);
            }
            ChromeIntent::NavigateTo(input) => {
                self.tabs.navigate_to(&input);
            }
            ChromeIntent::OpenDevTools => {
                if self.devtools {
                    self.tabs.open_devtools();
                } else {
                    debug!("devtools disabled");
                }
            }
            ChromeIntent::ChromeMetrics { toolbar_height, tab_bar_height } => {
                self.tabs.set_chrome_metrics(toolbar_height, tab_bar_height);
            }
            ChromeIntent::FaviconLoaded { tab_id, url } => self.tabs.favicon_loaded(tab_id, &url),
            ChromeIntent::FaviconFailed { tab_id, url } => self.tabs.favicon_failed(tab_id, &url),
            ChromeIntent::Minimize => actions.push(ShellAction::Minimize),
            ChromeIntent::ToggleMaximize => actions.push(ShellAction::ToggleMaximize),
            ChromeIntent::CloseWindow => actions.push(ShellAction::CloseWindow),
            ChromeIntent::DragWindow => actions.push(ShellAction::DragWindow),
            ChromeIntent::OpenInBrowser(url) => {
                let url = url
                    .filter(|u| !u.trim().is_empty())
                    .or_else(|| self.tabs.get_active_tab().map(|tab| tab.url.clone()));
                match url {
                    Some(url) => actions.push(ShellAction::OpenExternal(url)),
                    None => warn!("open in browser without a URL"),
                }
            }
            ChromeIntent::UpdateClicked => match self.update.click() {
                PromptAction::Download(url) => actions.push(ShellAction::StartDownload(url)),
                PromptAction::CheckForUpdate => actions.push(ShellAction::CheckForUpdate),
                PromptAction::None => {}
            },
            ChromeIntent::CheckForUpdate => actions.push(ShellAction::CheckForUpdate),
            ChromeIntent::CancelDownload => {
                if self.update.is_downloading() {
                    actions.push(ShellAction::CancelDownload);
                }
            }
        }
        actions.extend(self.pump());
        actions
    }

    /// Feeds a surface event to the host and runs the exchange.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) -> Vec<ShellAction> {
        self.host.handle_surface_event(event);
        self.pump()
    }

    /// Posts an event produced outside the tab lifecycle, such as an update
    /// check result, through the host's event queue.
    pub fn notify(&mut self, event: UiEvent) -> Vec<ShellAction> {
        self.host.notify(event);
        self.pump()
    }

    pub fn resize(&mut self, window: WindowSize) {
        self.host.resize(window);
    }

    /// Records the native window's maximized and fullscreen state.
    pub fn set_window_state(&mut self, maximized: bool, fullscreen: bool) {
        let state = WindowView { maximized, fullscreen };
        if state != self.window {
            debug!(maximized, fullscreen, "window state changed");
            self.window = state;
        }
    }

    /// Moves queued commands to the host and queued events to the UI until
    /// neither side has anything left.
    pub fn pump(&mut self) -> Vec<ShellAction> {
        let mut actions = Vec::new();
        loop {
            let commands = self.tabs.drain_commands();
            for command in commands.iter().cloned() {
                self.host.handle_command(command);
            }
            let events = self.host.drain_events();
            if commands.is_empty() && events.is_empty() {
                break;
            }
            for event in events {
                if let Some(action) = self.apply_event(&event) {
                    actions.push(action);
                }
            }
        }
        actions
    }

    fn apply_event(&mut self, event: &UiEvent) -> Option<ShellAction> {
        self.tabs.handle_event(event);
        self.update.handle_event(event);
        match event {
            UiEvent::UpdateAvailable { download_url, .. }
                if self.auto_download && self.update.should_auto_download(download_url) =>
            {
                self.update.download_started(download_url);
                Some(ShellAction::StartDownload(download_url.clone()))
            }
            _ => None,
        }
    }

    /// Everything the chrome needs to draw itself.
    pub fn chrome_view(&self) -> ChromeView {
        let navigation = self.tabs.navigation();
        ChromeView {
            tabs: self.tabs.tab_views(),
            active_id: self.tabs.active_tab_id(),
            url_bar: self.tabs.url_bar().to_string(),
            back_enabled: navigation.can_go_back,
            forward_enabled: navigation.can_go_forward,
            tab_bar_visible: self.tabs.tab_bar_visible(),
            update: self.update.view(),
            window: self.window,
        }
    }

    pub fn shutdown(&mut self) {
        self.host.shutdown();
    }
}
