//! Per-surface session history.
//!
//! Platform web views commit navigations without telling the embedder where
//! the commit landed in the back/forward list. `SessionHistory` rebuilds that
//! list from the observable signals: committed URLs, the traversal the host
//! itself requested, and history API reports from the page's bridge script.

use crate::surface::ManualNavigationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    Back,
    Forward,
    Reload,
}

/// Back/forward list of a single surface.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<String>,
    cursor: usize,
    pending: Option<Traversal>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Marks the next commit as a back traversal. Returns false when there is
    /// nothing to go back to.
    pub fn request_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.pending = Some(Traversal::Back);
        true
    }

    pub fn request_forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.pending = Some(Traversal::Forward);
        true
    }

    pub fn request_reload(&mut self) {
        self.pending = Some(Traversal::Reload);
    }

    /// A fresh load was requested; any pending traversal is void.
    pub fn request_load(&mut self) {
        self.pending = None;
    }

    /// Records a committed navigation.
    pub fn commit(&mut self, url: &str) {
        match self.pending.take() {
            Some(Traversal::Back) if self.cursor > 0 => {
                self.cursor -= 1;
                self.entries[self.cursor] = url.to_string();
            }
            Some(Traversal::Forward) if self.can_go_forward() => {
                self.cursor += 1;
                self.entries[self.cursor] = url.to_string();
            }
            Some(Traversal::Reload) if self.current().is_some() => {
                self.entries[self.cursor] = url.to_string();
            }
            _ => self.push(url),
        }
    }

    /// Records a client-side URL change reported by the page. A traversal
    /// onto a same-document entry only fires `popstate`, so any pending
    /// traversal has resolved by the time the page reports.
    pub fn record_manual(&mut self, url: &str, kind: ManualNavigationKind) {
        self.pending = None;
        match kind {
            ManualNavigationKind::Push => self.push(url),
            ManualNavigationKind::Replace => {
                if self.entries.is_empty() {
                    self.push(url);
                } else {
                    self.entries[self.cursor] = url.to_string();
                }
            }
            ManualNavigationKind::Pop => self.pop_to(url),
        }
    }

    fn push(&mut self, url: &str) {
        if self.current() == Some(url) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(url.to_string());
        self.cursor = self.entries.len() - 1;
    }

    /// Moves the cursor to the nearest entry matching `url`, looking backward
    /// first. Replaces the current entry when nothing matches.
    fn pop_to(&mut self, url: &str) {
        if self.current() == Some(url) {
            return;
        }
        let backward = (0..self.cursor).rev().find(|&i| self.entries[i] == url);
        let forward = (self.cursor + 1..self.entries.len()).find(|&i| self.entries[i] == url);
        match backward.or(forward) {
            Some(i) => self.cursor = i,
            None => self.record_manual(url, ManualNavigationKind::Replace),
        }
    }
}
