//! Content surfaces backed by wry child web views.
//!
//! Every handler is attached while the web view is built and captures the
//! surface's [`SurfaceId`], so events carry the identity of the view that
//! produced them no matter what the page posts.

use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};

use tao::event_loop::EventLoopProxy;
use tao::window::Window;
use tracing::debug;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use super::shell_window::ShellEvent;
use super::to_wry_rect;
use crate::ipc_handler::parse_surface_message;
use crate::managers::session_history::SessionHistory;
use crate::surface::{ContentSurface, SurfaceEvent, SurfaceEventKind, SurfaceFactory, SurfaceId};
use crate::types::errors::ViewError;
use crate::types::geometry::Rect;

/// Injected into every document a surface loads.
const SURFACE_BRIDGE_JS: &str = include_str!("../../resources/ui/surface_bridge.js");

type SharedHistory = Arc<Mutex<SessionHistory>>;

fn lock(history: &SharedHistory) -> MutexGuard<'_, SessionHistory> {
    history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn surface_error(e: wry::Error) -> ViewError {
    ViewError::Surface(e.to_string())
}

pub struct WrySurface {
    id: SurfaceId,
    webview: WebView,
    history: SharedHistory,
    requested_url: String,
}

impl ContentSurface for WrySurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn load_url(&mut self, url: &str) -> Result<(), ViewError> {
        lock(&self.history).request_load();
        self.requested_url = url.to_string();
        self.webview.load_url(url).map_err(surface_error)
    }

    fn go_back(&mut self) -> Result<(), ViewError> {
        if lock(&self.history).request_back() {
            self.webview.evaluate_script("history.back()").map_err(surface_error)?;
        }
        Ok(())
    }

    fn go_forward(&mut self) -> Result<(), ViewError> {
        if lock(&self.history).request_forward() {
            self.webview.evaluate_script("history.forward()").map_err(surface_error)?;
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<(), ViewError> {
        lock(&self.history).request_reload();
        self.webview.reload().map_err(surface_error)
    }

    fn can_go_back(&self) -> bool {
        lock(&self.history).can_go_back()
    }

    fn can_go_forward(&self) -> bool {
        lock(&self.history).can_go_forward()
    }

    /// Falls back to the last requested URL until the first commit.
    fn current_url(&self) -> String {
        lock(&self.history)
            .current()
            .map(str::to_string)
            .unwrap_or_else(|| self.requested_url.clone())
    }

    fn set_bounds(&mut self, bounds: Rect) -> Result<(), ViewError> {
        self.webview.set_bounds(to_wry_rect(bounds)).map_err(surface_error)
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), ViewError> {
        self.webview.set_visible(visible).map_err(surface_error)
    }

    fn open_devtools(&self) {
        #[cfg(debug_assertions)]
        self.webview.open_devtools();
        #[cfg(not(debug_assertions))]
        tracing::warn!(surface = %self.id, "devtools are not available in release builds");
    }
}

pub struct WrySurfaceFactory {
    window: Rc<Window>,
    proxy: EventLoopProxy<ShellEvent>,
    devtools: bool,
}

/// Hands a surface event to the event loop. Fails only once the loop exited.
fn post(proxy: &EventLoopProxy<ShellEvent>, event: SurfaceEvent) {
    let surface = event.surface;
    if let Err(e) = proxy.send_event(ShellEvent::Surface(event)) {
        debug!(%surface, error = %e, "event loop gone, surface event dropped");
    }
}

impl WrySurfaceFactory {
    pub fn new(window: Rc<Window>, proxy: EventLoopProxy<ShellEvent>, devtools: bool) -> Self {
        Self { window, proxy, devtools }
    }

    fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        id: SurfaceId,
        history: SharedHistory,
        proxy: EventLoopProxy<ShellEvent>,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            if let PageLoadEvent::Finished = event {
                lock(&history).commit(&url);
                post(&proxy, SurfaceEvent::new(id, SurfaceEventKind::Committed { url }));
            }
        })
    }

    fn attach_title_handler<'a>(
        builder: WebViewBuilder<'a>,
        id: SurfaceId,
        proxy: EventLoopProxy<ShellEvent>,
    ) -> WebViewBuilder<'a> {
        builder.with_document_title_changed_handler(move |title| {
            post(&proxy, SurfaceEvent::new(id, SurfaceEventKind::TitleChanged { title }));
        })
    }

    fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        id: SurfaceId,
        history: SharedHistory,
        proxy: EventLoopProxy<ShellEvent>,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request: wry::http::Request<String>| {
            match parse_surface_message(id, request.body()) {
                Ok(event) => {
                    if let SurfaceEventKind::ManualNavigation { url, kind } = &event.kind {
                        lock(&history).record_manual(url, *kind);
                    }
                    post(&proxy, event);
                }
                Err(e) => debug!(surface = %id, error = %e, "surface message ignored"),
            }
        })
    }

    fn attach_new_window_handler<'a>(
        builder: WebViewBuilder<'a>,
        id: SurfaceId,
        proxy: EventLoopProxy<ShellEvent>,
    ) -> WebViewBuilder<'a> {
        builder.with_new_window_req_handler(move |url, _features| {
            post(&proxy, SurfaceEvent::new(id, SurfaceEventKind::NewWindowRequested { url }));
            wry::NewWindowResponse::Deny
        })
    }
}

impl SurfaceFactory for WrySurfaceFactory {
    type Surface = WrySurface;

    fn create(&mut self, id: SurfaceId, bounds: Rect, url: &str) -> Result<WrySurface, ViewError> {
        let history: SharedHistory = Arc::new(Mutex::new(SessionHistory::new()));

        let mut builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(bounds))
            .with_devtools(self.devtools)
            .with_focused(false)
            .with_initialization_script(SURFACE_BRIDGE_JS)
            .with_url(url);
        builder = Self::attach_page_load_handler(builder, id, Arc::clone(&history), self.proxy.clone());
        builder = Self::attach_title_handler(builder, id, self.proxy.clone());
        builder = Self::attach_ipc_handler(builder, id, Arc::clone(&history), self.proxy.clone());
        builder = Self::attach_new_window_handler(builder, id, self.proxy.clone());

        let webview = builder
            .build_as_child(self.window.as_ref())
            .map_err(|e| ViewError::SurfaceCreation(e.to_string()))?;
        debug!(surface = %id, url, "surface created");

        Ok(WrySurface {
            id,
            webview,
            history,
            requested_url: url.to_string(),
        })
    }
}
