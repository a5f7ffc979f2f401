//! Content surface abstraction.
//!
//! A content surface is an isolated web-rendering unit (a platform web view)
//! with its own navigation history. The host never talks to the platform
//! directly; it goes through [`ContentSurface`] so the tab lifecycle can run
//! against any backend, including test doubles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::errors::ViewError;
use crate::types::geometry::Rect;

/// Internal identity of a surface. Assigned by the host when the surface is
/// created and stamped onto every event the surface's subscriptions emit.
/// Pages never see or supply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Navigation commands, state queries and geometry control of one surface.
pub trait ContentSurface {
    fn id(&self) -> SurfaceId;
    fn load_url(&mut self, url: &str) -> Result<(), ViewError>;
    fn go_back(&mut self) -> Result<(), ViewError>;
    fn go_forward(&mut self) -> Result<(), ViewError>;
    fn reload(&mut self) -> Result<(), ViewError>;
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn current_url(&self) -> String;
    fn set_bounds(&mut self, bounds: Rect) -> Result<(), ViewError>;
    fn set_visible(&mut self, visible: bool) -> Result<(), ViewError>;
    fn open_devtools(&self);
}

/// Creates surfaces. Implementations wire the fixed set of event
/// subscriptions at creation time, tagging each event with `id`.
pub trait SurfaceFactory {
    type Surface: ContentSurface;

    fn create(&mut self, id: SurfaceId, bounds: Rect, url: &str)
        -> Result<Self::Surface, ViewError>;
}

/// How a page-side script observed a client-side URL change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualNavigationKind {
    Push,
    Replace,
    Pop,
}

/// The fixed set of things a surface reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEventKind {
    /// A navigation (full load or same-document) committed.
    Committed { url: String },
    TitleChanged { title: String },
    /// Icon candidates announced by the page; empty when it has none.
    FaviconChanged { candidates: Vec<String> },
    /// The page tried to open a new window.
    NewWindowRequested { url: String },
    /// The injected bridge script reported a history API change.
    ManualNavigation { url: String, kind: ManualNavigationKind },
}

/// An event together with the identity of the surface that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceEvent {
    pub surface: SurfaceId,
    pub kind: SurfaceEventKind,
}

impl SurfaceEvent {
    pub fn new(surface: SurfaceId, kind: SurfaceEventKind) -> Self {
        Self { surface, kind }
    }
}
