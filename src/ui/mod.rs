//! TabShell UI layer.
//!
//! Uses `wry` child web views inside one `tao` window:
//! - one chrome view across the top that renders the tab bar and toolbar,
//! - one content surface per tab, stacked in the area below it.
//!
//! The chrome is plain HTML/CSS/JS. It holds no state; the shell pushes a
//! serialized view after every change and the chrome posts intents back over
//! wry IPC.

pub mod shell_window;
pub mod wry_surface;

use crate::types::geometry::Rect;

/// Converts a logical-pixel rectangle into wry bounds.
pub fn to_wry_rect(rect: Rect) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(rect.x as f64, rect.y as f64)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(rect.width as f64, rect.height as f64)),
    }
}
