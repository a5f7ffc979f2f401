//! Normalizes surface events into tab-tagged UI events.
//!
//! Full loads, same-document navigations and history API reports all take the
//! same path: `urlChanged` followed by `navigationState`. The UI cannot tell
//! them apart and does not need to.

use tracing::debug;

use crate::managers::view_registry::{NavigationSnapshot, ViewRegistry};
use crate::surface::{SurfaceEvent, SurfaceEventKind, SurfaceFactory};
use crate::types::message::UiEvent;
use crate::types::tab::TabId;

pub struct NavigationRelay;

impl NavigationRelay {
    /// Translates one surface event. The owning tab is resolved from the
    /// surface's internal identity; events from surfaces that are no longer
    /// registered are dropped.
    pub fn relay<F: SurfaceFactory>(registry: &ViewRegistry<F>, event: &SurfaceEvent) -> Vec<UiEvent> {
        let Some(tab_id) = registry.resolve(event.surface) else {
            debug!(surface_id = %event.surface, "event from unregistered surface dropped");
            return Vec::new();
        };

        match &event.kind {
            SurfaceEventKind::Committed { url } | SurfaceEventKind::ManualNavigation { url, .. } => {
                let mut events = vec![UiEvent::UrlChanged { tab_id, url: url.clone() }];
                if let Some(snapshot) = registry.snapshot(tab_id) {
                    events.push(Self::navigation_state(tab_id, &snapshot));
                }
                events
            }
            SurfaceEventKind::TitleChanged { title } => {
                vec![UiEvent::TitleChanged { tab_id, title: title.clone() }]
            }
            SurfaceEventKind::FaviconChanged { candidates } => {
                let icon_url = candidates
                    .iter()
                    .map(|c| c.trim())
                    .find(|c| !c.is_empty())
                    .map(str::to_string);
                vec![UiEvent::FaviconChanged { tab_id, icon_url }]
            }
            SurfaceEventKind::NewWindowRequested { url } => {
                if url.trim().is_empty() {
                    debug!(%tab_id, "new window request without url ignored");
                    return Vec::new();
                }
                vec![UiEvent::NewTabRequested { url: url.clone() }]
            }
        }
    }

    /// Events re-announcing a tab's navigation state, sent when it is raised.
    pub fn announce(tab_id: TabId, snapshot: &NavigationSnapshot) -> Vec<UiEvent> {
        vec![
            UiEvent::UrlChanged { tab_id, url: snapshot.url.clone() },
            Self::navigation_state(tab_id, snapshot),
        ]
    }

    fn navigation_state(tab_id: TabId, snapshot: &NavigationSnapshot) -> UiEvent {
        UiEvent::NavigationStateChanged {
            tab_id,
            can_go_back: snapshot.state.can_go_back,
            can_go_forward: snapshot.state.can_go_forward,
        }
    }
}
