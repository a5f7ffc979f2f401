//! Host controller.
//!
//! Owns the view registry and the layout controller, executes UI commands and
//! turns surface events into UI events. Every handler catches its own errors
//! and logs them; nothing here can take the host loop down.

use tracing::{debug, error};

use crate::managers::view_registry::ViewRegistry;
use crate::services::layout_controller::LayoutController;
use crate::services::navigation_relay::NavigationRelay;
use crate::surface::{ContentSurface, SurfaceEvent, SurfaceFactory};
use crate::types::errors::ViewError;
use crate::types::geometry::WindowSize;
use crate::types::message::{HostCommand, NavigationAction, UiEvent};
use crate::types::tab::TabId;

pub struct ShellHost<F: SurfaceFactory> {
    registry: ViewRegistry<F>,
    layout: LayoutController,
    home_url: String,
    outbox: Vec<UiEvent>,
}

impl<F: SurfaceFactory> ShellHost<F> {
    pub fn new(factory: F, window: WindowSize, initial_offset: u32, home_url: &str) -> Self {
        let layout = LayoutController::new(window, initial_offset);
        let registry = ViewRegistry::new(factory, layout.viewport());
        Self {
            registry,
            layout,
            home_url: home_url.to_string(),
            outbox: Vec::new(),
        }
    }

    pub fn registry(&self) -> &ViewRegistry<F> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ViewRegistry<F> {
        &mut self.registry
    }

    pub fn layout(&self) -> &LayoutController {
        &self.layout
    }

    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    /// Executes a UI command. Failures are logged, never propagated.
    pub fn handle_command(&mut self, command: HostCommand) {
        debug!(?command, "host command");
        if let Err(e) = self.execute(command) {
            error!(error = %e, "host command failed");
        }
    }

    fn execute(&mut self, command: HostCommand) -> Result<(), ViewError> {
        match command {
            HostCommand::CreateTab { tab_id, url } => self.create_tab(tab_id, &url),
            HostCommand::SwitchTab { tab_id } => {
                if let Some(snapshot) = self.registry.activate(tab_id) {
                    self.outbox.extend(NavigationRelay::announce(tab_id, &snapshot));
                }
                Ok(())
            }
            HostCommand::CloseTab { tab_id } => {
                self.registry.destroy(tab_id);
                Ok(())
            }
            HostCommand::Navigate { tab_id, action } => self.navigate(tab_id, action),
            HostCommand::UpdateViewPosition { offset_pixels } => {
                let bounds = self.layout.set_chrome_offset(offset_pixels);
                self.registry.apply_geometry_to_all(bounds);
                Ok(())
            }
            HostCommand::OpenDevTools { tab_id } => {
                match self.registry.get(tab_id) {
                    Some(surface) => surface.open_devtools(),
                    None => debug!(%tab_id, "devtools for unknown tab ignored"),
                }
                Ok(())
            }
        }
    }

    fn create_tab(&mut self, tab_id: TabId, url: &str) -> Result<(), ViewError> {
        let url = if url.trim().is_empty() { self.home_url.clone() } else { url.to_string() };
        match self.registry.create(tab_id, &url) {
            Ok(_) => Ok(()),
            Err(ViewError::AlreadyExists(_)) => Ok(()),
            Err(e) => {
                self.outbox.push(UiEvent::TabCreationFailed { tab_id });
                Err(e)
            }
        }
    }

    fn navigate(&mut self, tab_id: TabId, action: NavigationAction) -> Result<(), ViewError> {
        let Some(surface) = self.registry.get_mut(tab_id) else {
            debug!(%tab_id, "navigate for unknown tab ignored");
            return Ok(());
        };
        match action {
            NavigationAction::Back => {
                if surface.can_go_back() {
                    surface.go_back()?;
                }
            }
            NavigationAction::Forward => {
                if surface.can_go_forward() {
                    surface.go_forward()?;
                }
            }
            NavigationAction::Reload => surface.reload()?,
            NavigationAction::Home => surface.load_url(&self.home_url)?,
            NavigationAction::Url(url) => surface.load_url(&url)?,
        }
        Ok(())
    }

    /// Relays one surface event to the UI.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        let events = NavigationRelay::relay(&self.registry, &event);
        self.outbox.extend(events);
    }

    /// Window content area changed size.
    pub fn resize(&mut self, window: WindowSize) {
        if window == self.layout.window() {
            return;
        }
        let bounds = self.layout.resize(window);
        self.registry.apply_geometry_to_all(bounds);
    }

    /// Forwards an event produced outside the tab lifecycle (update feed,
    /// downloads) to the UI on the same ordered channel.
    pub fn notify(&mut self, event: UiEvent) {
        self.outbox.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn shutdown(&mut self) {
        debug!(count = self.registry.count(), "tearing down surfaces");
        self.registry.destroy_all();
    }
}
