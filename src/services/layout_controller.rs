//! Viewport geometry for content surfaces.
//!
//! The surface rectangle is a pure function of the window content size and the
//! chrome offset reported by the UI: `(0, offset, width, height - offset)`.

use crate::types::geometry::{Rect, WindowSize};

/// Tracks the last known window size and chrome offset.
#[derive(Debug, Clone)]
pub struct LayoutController {
    window: WindowSize,
    chrome_offset: u32,
}

impl LayoutController {
    /// `initial_offset` is used until the UI reports its real chrome height.
    /// A zero offset is bumped to 1 so no surface ever covers the chrome.
    pub fn new(window: WindowSize, initial_offset: u32) -> Self {
        Self {
            window,
            chrome_offset: initial_offset.max(1),
        }
    }

    /// Computes the surface rectangle for a window size and chrome offset.
    pub fn viewport_for(window: WindowSize, chrome_offset: u32) -> Rect {
        let offset = chrome_offset.min(window.height);
        Rect::new(0, offset, window.width, window.height - offset)
    }

    pub fn viewport(&self) -> Rect {
        Self::viewport_for(self.window, self.chrome_offset)
    }

    /// Records a window resize and returns the new viewport.
    pub fn resize(&mut self, window: WindowSize) -> Rect {
        self.window = window;
        self.viewport()
    }

    /// Records a chrome offset reported by the UI and returns the new viewport.
    pub fn set_chrome_offset(&mut self, offset: u32) -> Rect {
        self.chrome_offset = offset;
        self.viewport()
    }

    pub fn chrome_offset(&self) -> u32 {
        self.chrome_offset
    }

    pub fn window(&self) -> WindowSize {
        self.window
    }

    /// Rectangle reserved for the chrome itself, above the surfaces.
    pub fn chrome_rect(&self) -> Rect {
        Rect::new(0, 0, self.window.width, self.chrome_offset.min(self.window.height))
    }
}
