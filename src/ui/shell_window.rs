//! The TabShell window: tao event loop, chrome web view and update tasks.
//!
//! Every callback that fires off the main thread (surface handlers, chrome
//! IPC, update tasks) posts a [`ShellEvent`] through the event loop proxy.
//! The loop applies them to the [`Shell`] one at a time, in arrival order.

use std::error::Error;
use std::rc::Rc;

use tao::dpi::LogicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use tao::window::{Window, WindowBuilder};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use wry::{WebView, WebViewBuilder};

use super::to_wry_rect;
use super::wry_surface::WrySurfaceFactory;
use crate::app::{Shell, ShellAction};
use crate::ipc_handler::{parse_chrome_message, ChromeIntent, MAX_MESSAGE_SIZE};
use crate::platform;
use crate::services::update_coordinator::UpdateCoordinator;
use crate::surface::SurfaceEvent;
use crate::types::config::ShellConfig;
use crate::types::geometry::WindowSize;
use crate::types::message::UiEvent;

const CHROME_HTML: &str = include_str!("../../resources/ui/chrome.html");
const CHROME_CSS: &str = include_str!("../../resources/ui/chrome.css");
const CHROME_JS: &str = include_str!("../../resources/ui/chrome.js");

/// Everything that reaches the main thread from elsewhere.
#[derive(Debug)]
pub enum ShellEvent {
    Surface(SurfaceEvent),
    /// Raw IPC body posted by the chrome.
    Chrome(String),
    /// Result of an update check or download.
    Update(UiEvent),
}

/// Inlines the stylesheet and script into the chrome document.
fn chrome_page() -> String {
    CHROME_HTML
        .replace("/*__CHROME_CSS__*/", CHROME_CSS)
        .replace("/*__CHROME_JS__*/", CHROME_JS)
}

fn window_size(window: &Window) -> WindowSize {
    let size: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    WindowSize::new(size.width.round() as u32, size.height.round() as u32)
}

struct ShellWindow {
    shell: Shell<WrySurfaceFactory>,
    window: Rc<Window>,
    chrome: WebView,
    runtime: Runtime,
    updates: UpdateCoordinator,
    proxy: EventLoopProxy<ShellEvent>,
    download_cancel: Option<watch::Sender<bool>>,
    last_render: String,
    chrome_offset: u32,
}

impl ShellWindow {
    /// Returns `false` once the window should close.
    fn handle(&mut self, event: ShellEvent) -> bool {
        let actions = match event {
            ShellEvent::Surface(event) => self.shell.handle_surface_event(event),
            ShellEvent::Chrome(body) => match parse_chrome_message(&body) {
                Ok(ChromeIntent::Ready) => {
                    // A reloaded chrome has lost whatever it was last sent.
                    self.last_render.clear();
                    self.shell.handle_intent(ChromeIntent::Ready)
                }
                Ok(intent) => self.shell.handle_intent(intent),
                Err(e) => {
                    warn!(error = %e, "chrome message ignored");
                    Vec::new()
                }
            },
            ShellEvent::Update(event) => {
                if matches!(event, UiEvent::UpdateDownloadFinished { .. }) {
                    self.download_cancel = None;
                }
                self.shell.notify(event)
            }
        };
        let mut keep_running = true;
        for action in actions {
            keep_running &= self.perform(action);
        }
        self.sync_chrome_bounds();
        self.render();
        keep_running
    }

    fn perform(&mut self, action: ShellAction) -> bool {
        match action {
            ShellAction::Minimize => self.window.set_minimized(true),
            ShellAction::ToggleMaximize => self.window.set_maximized(!self.window.is_maximized()),
            ShellAction::CloseWindow => return false,
            ShellAction::DragWindow => {
                if let Err(e) = self.window.drag_window() {
                    debug!(error = %e, "window drag failed");
                }
            }
            ShellAction::OpenExternal(url) => platform::open_external(&url),
            ShellAction::StartDownload(url) => self.start_download(url),
            ShellAction::CheckForUpdate => self.check_for_update(),
            ShellAction::CancelDownload => {
                if let Some(cancel) = &self.download_cancel {
                    if let Err(e) = cancel.send(true) {
                        debug!(error = %e, "download already finished");
                    }
                }
            }
        }
        true
    }

    fn start_download(&mut self, url: String) {
        if self.download_cancel.is_some() {
            debug!("download already running");
            return;
        }
        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.download_cancel = Some(cancel_tx);
        let updates = self.updates.clone();
        let proxy = self.proxy.clone();
        self.runtime.spawn(async move {
            let outcome = updates.download(&url, cancel_rx).await;
            let event = ShellEvent::Update(UiEvent::UpdateDownloadFinished { outcome });
            if let Err(e) = proxy.send_event(event) {
                debug!(error = %e, "event loop gone, download result dropped");
            }
        });
    }

    fn check_for_update(&self) {
        let updates = self.updates.clone();
        let proxy = self.proxy.clone();
        self.runtime.spawn(async move {
            let status = updates.check().await;
            if let Err(e) = proxy.send_event(ShellEvent::Update(status.into_event())) {
                debug!(error = %e, "event loop gone, update status dropped");
            }
        });
    }

    fn start_periodic_checks(&self) {
        if !self.updates.settings().is_configured() {
            info!("update feed not configured, periodic checks disabled");
            return;
        }
        let proxy = self.proxy.clone();
        self.runtime.spawn(self.updates.clone().run_periodic(move |status| {
            proxy.send_event(ShellEvent::Update(status.into_event())).is_ok()
        }));
    }

    fn resize(&mut self) {
        self.shell.resize(window_size(&self.window));
        self.shell
            .set_window_state(self.window.is_maximized(), self.window.fullscreen().is_some());
        let layout = self.shell.host().layout();
        self.chrome_offset = layout.chrome_offset();
        if let Err(e) = self.chrome.set_bounds(to_wry_rect(layout.chrome_rect())) {
            warn!(error = %e, "failed to resize chrome");
        }
    }

    /// The chrome view spans exactly the reserved strip above the surfaces.
    fn sync_chrome_bounds(&mut self) {
        let layout = self.shell.host().layout();
        if layout.chrome_offset() == self.chrome_offset {
            return;
        }
        self.chrome_offset = layout.chrome_offset();
        if let Err(e) = self.chrome.set_bounds(to_wry_rect(layout.chrome_rect())) {
            warn!(error = %e, "failed to move chrome");
        }
    }

    fn render(&mut self) {
        let json = match serde_json::to_string(&self.shell.chrome_view()) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize chrome view");
                return;
            }
        };
        if json == self.last_render {
            return;
        }
        let script = format!("window.__tabshell_render && window.__tabshell_render({})", json);
        match self.chrome.evaluate_script(&script) {
            Ok(()) => self.last_render = json,
            Err(e) => warn!(error = %e, "failed to render chrome"),
        }
    }
}

/// Builds the window and runs the event loop. Only returns on setup errors.
pub fn run(config: ShellConfig) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoopBuilder::<ShellEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = Rc::new(
        WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.window.width as f64, config.window.height as f64))
            .with_min_inner_size(LogicalSize::new(config.window.min_width as f64, 400.0))
            .with_decorations(config.window.decorations)
            .build(&event_loop)?,
    );

    let factory = WrySurfaceFactory::new(Rc::clone(&window), proxy.clone(), config.devtools);
    let mut shell = Shell::new(factory, &config, window_size(&window));
    let startup_actions = shell.start();

    let chrome_proxy = proxy.clone();
    let chrome = WebViewBuilder::new()
        .with_bounds(to_wry_rect(shell.host().layout().chrome_rect()))
        .with_html(chrome_page())
        .with_devtools(config.devtools)
        .with_ipc_handler(move |request: wry::http::Request<String>| {
            let body = request.body();
            if body.is_empty() || body.len() > MAX_MESSAGE_SIZE {
                return;
            }
            if let Err(e) = chrome_proxy.send_event(ShellEvent::Chrome(body.clone())) {
                debug!(error = %e, "event loop gone, chrome message dropped");
            }
        })
        .build_as_child(window.as_ref())?;

    let runtime = Runtime::new()?;
    let updates = UpdateCoordinator::new(config.update.clone());

    let chrome_offset = shell.host().layout().chrome_offset();
    let mut state = ShellWindow {
        shell,
        window,
        chrome,
        runtime,
        updates,
        proxy,
        download_cancel: None,
        last_render: String::new(),
        chrome_offset,
    };
    for action in startup_actions {
        state.perform(action);
    }
    state.render();
    state.start_periodic_checks();
    info!(home_url = %config.home_url, "shell started");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
                state.shell.shutdown();
                *control_flow = ControlFlow::Exit;
            }
            Event::WindowEvent { event: WindowEvent::Resized(_), .. }
            | Event::WindowEvent { event: WindowEvent::ScaleFactorChanged { .. }, .. } => {
                state.resize();
                state.render();
            }
            Event::UserEvent(event) => {
                if !state.handle(event) {
                    state.shell.shutdown();
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    })
}
