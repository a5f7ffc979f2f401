//! Decoding of messages posted by web content.
//!
//! Two sources post messages: the chrome web view (user intents, shaped
//! `{"cmd": "...", ...}`) and the bridge script injected into every content
//! surface (`{"type": "...", ...}`). Surface messages never name their tab;
//! the caller supplies the [`SurfaceId`] bound to the handler that received
//! the message, so a page cannot speak for another tab.

use serde_json::Value;

use crate::surface::{ManualNavigationKind, SurfaceEvent, SurfaceEventKind, SurfaceId};
use crate::types::errors::IpcError;
use crate::types::message::NavigationAction;
use crate::types::tab::TabId;

/// Upper bound on a single IPC message body.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// A user intent raised by the chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromeIntent {
    /// The chrome finished loading and wants its first render.
    Ready,
    NewTab { url: Option<String> },
    SwitchTab(TabId),
    CloseTab(TabId),
    Navigate(NavigationAction),
    /// Raw URL bar input, normalized later.
    NavigateTo(String),
    OpenDevTools,
    ChromeMetrics { toolbar_height: u32, tab_bar_height: u32 },
    FaviconLoaded { tab_id: TabId, url: String },
    FaviconFailed { tab_id: TabId, url: String },
    Minimize,
    ToggleMaximize,
    CloseWindow,
    DragWindow,
    /// Opens the given URL, or the active tab's URL, in the system browser.
    OpenInBrowser(Option<String>),
    UpdateClicked,
    CheckForUpdate,
    CancelDownload,
}

fn parse_body(body: &str) -> Result<Value, IpcError> {
    if body.len() > MAX_MESSAGE_SIZE {
        return Err(IpcError::Malformed(format!("message of {} bytes exceeds limit", body.len())));
    }
    serde_json::from_str(body).map_err(|e| IpcError::Malformed(e.to_string()))
}

fn str_param<'a>(msg: &'a Value, key: &str) -> Result<&'a str, IpcError> {
    msg.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| IpcError::Malformed(format!("missing {}", key)))
}

fn u32_param(msg: &Value, key: &str) -> Result<u32, IpcError> {
    msg.get(key)
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round().min(u32::MAX as f64) as u32)
        .ok_or_else(|| IpcError::Malformed(format!("missing {}", key)))
}

fn tab_param(msg: &Value) -> Result<TabId, IpcError> {
    msg.get("id")
        .and_then(|v| v.as_u64())
        .map(TabId)
        .ok_or_else(|| IpcError::Malformed("missing id".to_string()))
}

/// Parses one chrome message.
pub fn parse_chrome_message(body: &str) -> Result<ChromeIntent, IpcError> {
    let msg = parse_body(body)?;
    let cmd = str_param(&msg, "cmd")?;

    let intent = match cmd {
        "ready" => ChromeIntent::Ready,
        "new_tab" => ChromeIntent::NewTab {
            url: msg.get("url").and_then(|v| v.as_str()).map(str::to_string),
        },
        "switch_tab" => ChromeIntent::SwitchTab(tab_param(&msg)?),
        "close_tab" => ChromeIntent::CloseTab(tab_param(&msg)?),
        "navigate" => {
            let action = match str_param(&msg, "action")? {
                "back" => NavigationAction::Back,
                "forward" => NavigationAction::Forward,
                "reload" => NavigationAction::Reload,
                "home" => NavigationAction::Home,
                other => return Err(IpcError::Malformed(format!("unknown navigation action {}", other))),
            };
            ChromeIntent::Navigate(action)
        }
        "navigate_to" => ChromeIntent::NavigateTo(str_param(&msg, "url")?.to_string()),
        "open_devtools" => ChromeIntent::OpenDevTools,
        "chrome_metrics" => ChromeIntent::ChromeMetrics {
            toolbar_height: u32_param(&msg, "toolbarHeight")?,
            tab_bar_height: u32_param(&msg, "tabBarHeight")?,
        },
        "favicon_loaded" => ChromeIntent::FaviconLoaded {
            tab_id: tab_param(&msg)?,
            url: str_param(&msg, "url")?.to_string(),
        },
        "favicon_failed" => ChromeIntent::FaviconFailed {
            tab_id: tab_param(&msg)?,
            url: str_param(&msg, "url")?.to_string(),
        },
        "minimize" => ChromeIntent::Minimize,
        "toggle_maximize" => ChromeIntent::ToggleMaximize,
        "close_window" => ChromeIntent::CloseWindow,
        "drag_window" => ChromeIntent::DragWindow,
        "open_in_browser" => ChromeIntent::OpenInBrowser(
            msg.get("url").and_then(|v| v.as_str()).map(str::to_string),
        ),
        "update_clicked" => ChromeIntent::UpdateClicked,
        "check_update" => ChromeIntent::CheckForUpdate,
        "cancel_download" => ChromeIntent::CancelDownload,
        other => return Err(IpcError::UnknownCommand(other.to_string())),
    };
    Ok(intent)
}

/// Parses one bridge report from a content surface. Any tab identifier in
/// the payload is ignored; identity comes from `surface` alone.
pub fn parse_surface_message(surface: SurfaceId, body: &str) -> Result<SurfaceEvent, IpcError> {
    let msg = parse_body(body)?;
    let kind = match str_param(&msg, "type")? {
        "manual_navigation" => {
            let kind = match msg.get("kind").and_then(|v| v.as_str()).unwrap_or("push") {
                "push" => ManualNavigationKind::Push,
                "replace" => ManualNavigationKind::Replace,
                "pop" => ManualNavigationKind::Pop,
                other => return Err(IpcError::Malformed(format!("unknown navigation kind {}", other))),
            };
            SurfaceEventKind::ManualNavigation {
                url: str_param(&msg, "url")?.to_string(),
                kind,
            }
        }
        "favicon" => {
            let candidates = msg
                .get("candidates")
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_str())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            SurfaceEventKind::FaviconChanged { candidates }
        }
        other => return Err(IpcError::UnknownCommand(other.to_string())),
    };
    Ok(SurfaceEvent::new(surface, kind))
}
