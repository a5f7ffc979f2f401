//! Shared test doubles: an in-memory surface backend with native history.
//!
//! Surfaces record everything done to them in a shared [`FakeWorld`]. Commits
//! are not delivered synchronously; they are queued in the world and handed
//! to the shell by [`settle`], the way a platform web view reports them
//! later from its own callbacks.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tabshell::app::Shell;
use tabshell::surface::{
    ContentSurface, ManualNavigationKind, SurfaceEvent, SurfaceEventKind, SurfaceFactory, SurfaceId,
};
use tabshell::types::config::ShellConfig;
use tabshell::types::errors::ViewError;
use tabshell::types::geometry::{Rect, WindowSize};
use tabshell::types::tab::TabId;

pub const HOME: &str = "https://home.test/";
pub const WINDOW: WindowSize = WindowSize { width: 1200, height: 800 };

#[derive(Debug, Clone)]
pub struct SurfaceRecord {
    pub entries: Vec<String>,
    pub cursor: usize,
    pub bounds: Rect,
    pub visible: bool,
    pub alive: bool,
    pub devtools_opened: u32,
    pub reloads: u32,
}

impl SurfaceRecord {
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }
}

#[derive(Debug, Default)]
pub struct FakeWorld {
    pub surfaces: HashMap<SurfaceId, SurfaceRecord>,
    /// Surface ids in creation order.
    pub created: Vec<SurfaceId>,
    /// Number of upcoming `create` calls that fail.
    pub fail_creates: u32,
    pub create_attempts: u32,
    pub pending: VecDeque<SurfaceEvent>,
}

pub type SharedWorld = Rc<RefCell<FakeWorld>>;

impl FakeWorld {
    pub fn record(&self, id: SurfaceId) -> SurfaceRecord {
        self.surfaces[&id].clone()
    }

    pub fn alive(&self) -> Vec<SurfaceId> {
        self.created
            .iter()
            .copied()
            .filter(|id| self.surfaces[id].alive)
            .collect()
    }

    pub fn visible(&self) -> Vec<SurfaceId> {
        self.created
            .iter()
            .copied()
            .filter(|id| self.surfaces[id].alive && self.surfaces[id].visible)
            .collect()
    }
}

pub struct FakeSurface {
    id: SurfaceId,
    world: SharedWorld,
}

impl FakeSurface {
    fn with<R>(&self, f: impl FnOnce(&mut SurfaceRecord) -> R) -> R {
        let mut world = self.world.borrow_mut();
        let record = world.surfaces.get_mut(&self.id).expect("surface record");
        f(record)
    }

    fn commit_current(&self) {
        let url = self.with(|r| r.current().to_string());
        self.world
            .borrow_mut()
            .pending
            .push_back(SurfaceEvent::new(self.id, SurfaceEventKind::Committed { url }));
    }
}

impl ContentSurface for FakeSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn load_url(&mut self, url: &str) -> Result<(), ViewError> {
        self.with(|r| {
            r.entries.truncate(r.cursor + 1);
            r.entries.push(url.to_string());
            r.cursor = r.entries.len() - 1;
        });
        self.commit_current();
        Ok(())
    }

    fn go_back(&mut self) -> Result<(), ViewError> {
        let moved = self.with(|r| {
            if r.cursor > 0 {
                r.cursor -= 1;
                true
            } else {
                false
            }
        });
        if moved {
            self.commit_current();
        }
        Ok(())
    }

    fn go_forward(&mut self) -> Result<(), ViewError> {
        let moved = self.with(|r| {
            if r.cursor + 1 < r.entries.len() {
                r.cursor += 1;
                true
            } else {
                false
            }
        });
        if moved {
            self.commit_current();
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<(), ViewError> {
        self.with(|r| r.reloads += 1);
        self.commit_current();
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        self.with(|r| r.cursor > 0)
    }

    fn can_go_forward(&self) -> bool {
        self.with(|r| r.cursor + 1 < r.entries.len())
    }

    fn current_url(&self) -> String {
        self.with(|r| r.current().to_string())
    }

    fn set_bounds(&mut self, bounds: Rect) -> Result<(), ViewError> {
        self.with(|r| r.bounds = bounds);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), ViewError> {
        self.with(|r| r.visible = visible);
        Ok(())
    }

    fn open_devtools(&self) {
        self.with(|r| r.devtools_opened += 1);
    }
}

impl Drop for FakeSurface {
    fn drop(&mut self) {
        if let Ok(mut world) = self.world.try_borrow_mut() {
            if let Some(record) = world.surfaces.get_mut(&self.id) {
                record.alive = false;
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeFactory {
    pub world: SharedWorld,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SurfaceFactory for FakeFactory {
    type Surface = FakeSurface;

    fn create(&mut self, id: SurfaceId, bounds: Rect, url: &str) -> Result<FakeSurface, ViewError> {
        let mut world = self.world.borrow_mut();
        world.create_attempts += 1;
        if world.fail_creates > 0 {
            world.fail_creates -= 1;
            return Err(ViewError::SurfaceCreation("fake backend refused".to_string()));
        }
        world.surfaces.insert(
            id,
            SurfaceRecord {
                entries: vec![url.to_string()],
                cursor: 0,
                bounds,
                visible: true,
                alive: true,
                devtools_opened: 0,
                reloads: 0,
            },
        );
        if !world.created.contains(&id) {
            world.created.push(id);
        }
        world
            .pending
            .push_back(SurfaceEvent::new(id, SurfaceEventKind::Committed { url: url.to_string() }));
        Ok(FakeSurface {
            id,
            world: Rc::clone(&self.world),
        })
    }
}

pub fn test_config() -> ShellConfig {
    let mut config = ShellConfig::default();
    config.home_url = HOME.to_string();
    config.devtools = true;
    config.window.width = WINDOW.width;
    config.window.height = WINDOW.height;
    config.chrome.toolbar_height = 44;
    config.chrome.tab_bar_height = 36;
    config.chrome.initial_offset = 80;
    config
}

/// A started shell on the fake backend plus a handle to its world.
pub fn started_shell() -> (Shell<FakeFactory>, SharedWorld) {
    let factory = FakeFactory::new();
    let world = Rc::clone(&factory.world);
    let mut shell = Shell::new(factory, &test_config(), WINDOW);
    shell.start();
    settle(&mut shell, &world);
    (shell, world)
}

/// Delivers queued surface events until none are left.
pub fn settle(shell: &mut Shell<FakeFactory>, world: &SharedWorld) {
    loop {
        let next = world.borrow_mut().pending.pop_front();
        match next {
            Some(event) => {
                shell.handle_surface_event(event);
            }
            None => break,
        }
    }
}

/// Simulates a history API navigation inside the page: the surface's own
/// history moves and the bridge report is queued.
pub fn navigate_in_page(world: &SharedWorld, surface: SurfaceId, url: &str, kind: ManualNavigationKind) {
    let mut world = world.borrow_mut();
    if let Some(record) = world.surfaces.get_mut(&surface) {
        match kind {
            ManualNavigationKind::Push => {
                record.entries.truncate(record.cursor + 1);
                record.entries.push(url.to_string());
                record.cursor = record.entries.len() - 1;
            }
            ManualNavigationKind::Replace | ManualNavigationKind::Pop => {
                let cursor = record.cursor;
                record.entries[cursor] = url.to_string();
            }
        }
    }
    world.pending.push_back(SurfaceEvent::new(
        surface,
        SurfaceEventKind::ManualNavigation { url: url.to_string(), kind },
    ));
}

/// Queues an arbitrary event as if `surface` had emitted it.
pub fn emit(world: &SharedWorld, surface: SurfaceId, kind: SurfaceEventKind) {
    world.borrow_mut().pending.push_back(SurfaceEvent::new(surface, kind));
}

/// Internal identity of the surface backing `tab`.
pub fn surface_of(shell: &Shell<FakeFactory>, tab: TabId) -> SurfaceId {
    shell.host().registry().get(tab).expect("tab has a surface").id()
}
