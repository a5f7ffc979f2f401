//! Host-side registry of content surfaces.
//!
//! The registry is the authority on which surfaces exist and which one is on
//! top. It is owned by the host controller and mutated only from the host's
//! event loop.

use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::surface::{ContentSurface, SurfaceFactory, SurfaceId};
use crate::types::errors::ViewError;
use crate::types::geometry::Rect;
use crate::types::tab::{NavigationState, TabId};

/// Current URL and back/forward availability of one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub url: String,
    pub state: NavigationState,
}

impl NavigationSnapshot {
    pub fn of<S: ContentSurface>(surface: &S) -> Self {
        Self {
            url: surface.current_url(),
            state: NavigationState {
                can_go_back: surface.can_go_back(),
                can_go_forward: surface.can_go_forward(),
            },
        }
    }
}

/// Maps tab ids to their surfaces.
pub struct ViewRegistry<F: SurfaceFactory> {
    factory: F,
    views: HashMap<TabId, F::Surface>,
    /// Creation order, so iteration over surfaces is deterministic.
    order: Vec<TabId>,
    top: Option<TabId>,
    bounds: Rect,
    next_surface: u64,
}

impl<F: SurfaceFactory> ViewRegistry<F> {
    pub fn new(factory: F, bounds: Rect) -> Self {
        Self {
            factory,
            views: HashMap::new(),
            order: Vec::new(),
            top: None,
            bounds,
            next_surface: 1,
        }
    }

    fn allocate_surface_id(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        id
    }

    /// Instantiates a surface for `tab_id`, applies the current geometry and
    /// starts loading `url`. A failed instantiation is retried once; nothing
    /// is registered unless a surface was actually created.
    pub fn create(&mut self, tab_id: TabId, url: &str) -> Result<SurfaceId, ViewError> {
        if self.views.contains_key(&tab_id) {
            warn!(%tab_id, "surface already registered, ignoring create");
            return Err(ViewError::AlreadyExists(tab_id));
        }

        let surface_id = self.allocate_surface_id();
        let surface = match self.factory.create(surface_id, self.bounds, url) {
            Ok(surface) => surface,
            Err(first) => {
                warn!(%tab_id, %surface_id, error = %first, "surface creation failed, retrying once");
                self.factory.create(surface_id, self.bounds, url).map_err(|e| {
                    error!(%tab_id, %surface_id, error = %e, "surface creation failed after retry");
                    e
                })?
            }
        };

        self.views.insert(tab_id, surface);
        self.order.push(tab_id);
        self.raise(tab_id);
        debug!(%tab_id, %surface_id, url, "surface created");
        Ok(surface_id)
    }

    /// Raises the surface for `tab_id` to the top and returns its navigation
    /// state so the caller can re-announce it. Unknown ids are ignored.
    pub fn activate(&mut self, tab_id: TabId) -> Option<NavigationSnapshot> {
        if !self.views.contains_key(&tab_id) {
            debug!(%tab_id, "activate for unknown tab ignored");
            return None;
        }
        self.raise(tab_id);
        self.snapshot(tab_id)
    }

    fn raise(&mut self, tab_id: TabId) {
        for id in &self.order {
            if let Some(surface) = self.views.get_mut(id) {
                if let Err(e) = surface.set_visible(*id == tab_id) {
                    warn!(tab_id = %id, error = %e, "failed to change surface visibility");
                }
            }
        }
        self.top = Some(tab_id);
    }

    /// Tears down the surface for `tab_id`. Returns whether anything was removed.
    pub fn destroy(&mut self, tab_id: TabId) -> bool {
        let Some(mut surface) = self.views.remove(&tab_id) else {
            debug!(%tab_id, "destroy for unknown tab ignored");
            return false;
        };
        if let Err(e) = surface.set_visible(false) {
            warn!(%tab_id, error = %e, "failed to hide surface before teardown");
        }
        self.order.retain(|id| *id != tab_id);
        if self.top == Some(tab_id) {
            self.top = None;
        }
        debug!(%tab_id, surface_id = %surface.id(), "surface destroyed");
        true
    }

    /// Sets `bounds` on every tracked surface, not only the one on top.
    pub fn apply_geometry_to_all(&mut self, bounds: Rect) {
        self.bounds = bounds;
        for id in &self.order {
            if let Some(surface) = self.views.get_mut(id) {
                if let Err(e) = surface.set_bounds(bounds) {
                    warn!(tab_id = %id, error = %e, "failed to apply surface bounds");
                }
            }
        }
    }

    /// Resolves a surface's internal identity to the tab that owns it.
    pub fn resolve(&self, surface_id: SurfaceId) -> Option<TabId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.views.get(id).map(|s| s.id()) == Some(surface_id))
    }

    pub fn snapshot(&self, tab_id: TabId) -> Option<NavigationSnapshot> {
        self.views.get(&tab_id).map(NavigationSnapshot::of)
    }

    pub fn get(&self, tab_id: TabId) -> Option<&F::Surface> {
        self.views.get(&tab_id)
    }

    pub fn get_mut(&mut self, tab_id: TabId) -> Option<&mut F::Surface> {
        self.views.get_mut(&tab_id)
    }

    pub fn contains(&self, tab_id: TabId) -> bool {
        self.views.contains_key(&tab_id)
    }

    /// Tab ids in creation order.
    pub fn tab_ids(&self) -> &[TabId] {
        &self.order
    }

    pub fn top(&self) -> Option<TabId> {
        self.top
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn count(&self) -> usize {
        self.views.len()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Destroys every surface. Used on window close.
    pub fn destroy_all(&mut self) {
        let ids = self.order.clone();
        for id in ids {
            self.destroy(id);
        }
    }
}
