//! History store: the visited-URL list and the indices that track it.
//!
//! The store never talks to the surface directly. Traversal operations
//! return a [`Traversal`] describing what the surface must be asked to do,
//! and the surface's committed-navigation notifications are fed back
//! through [`HistoryStore::on_navigation_committed`].

use crate::surface::LoadOptions;

/// What the surface must do to carry out a traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum Traversal {
    /// Same-document back, within the current in-page run.
    InPlaceBack,
    /// Same-document forward, within the current in-page run.
    InPlaceForward,
    /// Same-document jump by the given offset.
    InPlaceOffset(isize),
    /// Full load of a history entry.
    Load { url: String, options: LoadOptions },
}

/// Ordered list of visited URLs plus committed, pending and in-page
/// run indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    history: Vec<String>,
    current_index: Option<usize>,
    pending_index: Option<usize>,
    in_page_index: Option<usize>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the surface's already-committed URL, if any.
    pub fn primed(url: &str) -> Self {
        let mut store = Self::new();
        if !url.is_empty() {
            store.history.push(url.to_string());
            store.current_index = Some(0);
        }
        store
    }

    // -------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------

    /// Fold a committed main-frame navigation into the history.
    ///
    /// Run tracking looks at the indices as they were before this commit.
    pub fn on_navigation_committed(&mut self, url: &str, is_in_page: bool, is_replace: bool) {
        match self.in_page_index {
            Some(_) if !is_in_page => self.in_page_index = None,
            None if is_in_page && !is_replace => self.in_page_index = self.current_index,
            _ => {},
        }

        if let Some(pending) = self.pending_index.take() {
            if pending < self.history.len() {
                self.history[pending] = url.to_string();
                self.current_index = Some(pending);
            } else {
                self.history.push(url.to_string());
                self.current_index = Some(self.history.len() - 1);
            }
            log::debug!("Committed pending entry {pending}: {url}");
            return;
        }

        match self.current_index {
            Some(current) if is_replace => {
                self.history[current] = url.to_string();
                log::debug!("Replaced entry {current}: {url}");
            },
            _ => {
                let keep = self.current_index.map_or(0, |c| c + 1);
                self.history.truncate(keep);
                self.history.push(url.to_string());
                self.current_index = Some(self.history.len() - 1);
                log::debug!(
                    "Appended entry {}: {url} (in_page={is_in_page})",
                    self.history.len() - 1
                );
            },
        }
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    pub fn entries(&self) -> &[String] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn pending_index(&self) -> Option<usize> {
        self.pending_index
    }

    pub fn in_page_index(&self) -> Option<usize> {
        self.in_page_index
    }

    /// The index UI should treat as current: pending if a navigation is
    /// in flight, else committed.
    pub fn active_index(&self) -> Option<usize> {
        self.pending_index.or(self.current_index)
    }

    /// URL of the committed entry, or `""`.
    pub fn url(&self) -> &str {
        self.current_index
            .and_then(|i| self.history.get(i))
            .map_or("", String::as_str)
    }

    /// URL at `index`, if in range.
    pub fn entry_at(&self, index: isize) -> Option<&str> {
        self.checked_index(index)
            .map(|i| self.history[i].as_str())
    }

    pub fn can_go_back(&self) -> bool {
        as_signed(self.active_index()) > 0
    }

    pub fn can_go_forward(&self) -> bool {
        as_signed(self.active_index()) < self.history.len() as isize - 1
    }

    pub fn can_go_to_index(&self, index: isize) -> bool {
        self.checked_index(index).is_some()
    }

    pub fn can_go_to_offset(&self, offset: isize) -> bool {
        self.can_go_to_index(as_signed(self.current_index).saturating_add(offset))
    }

    // -------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------

    /// Forget every entry and index.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Drop any pending index; a fresh load is never index-directed.
    pub fn reset_pending(&mut self) {
        self.pending_index = None;
    }

    pub fn go_back(&mut self) -> Option<Traversal> {
        if !self.can_go_back() {
            log::debug!("go_back ignored at index {:?}", self.active_index());
            return None;
        }
        let target = (as_signed(self.active_index()) - 1) as usize;
        self.pending_index = Some(target);
        if self.in_run(target) {
            Some(Traversal::InPlaceBack)
        } else {
            self.load_entry(target)
        }
    }

    pub fn go_forward(&mut self) -> Option<Traversal> {
        if !self.can_go_forward() {
            log::debug!("go_forward ignored at index {:?}", self.active_index());
            return None;
        }
        let target = (as_signed(self.active_index()) + 1) as usize;
        self.pending_index = Some(target);
        if self.in_run(target) {
            Some(Traversal::InPlaceForward)
        } else {
            self.load_entry(target)
        }
    }

    /// Jump to an arbitrary entry. Always a full load: an index jump is not
    /// assumed to stay inside an in-page run.
    pub fn go_to_index(&mut self, index: isize) -> Option<Traversal> {
        let Some(target) = self.checked_index(index) else {
            log::debug!("go_to_index({index}) out of range (len {})", self.len());
            return None;
        };
        self.pending_index = Some(target);
        self.load_entry(target)
    }

    pub fn go_to_offset(&mut self, offset: isize) -> Option<Traversal> {
        if !self.can_go_to_offset(offset) {
            log::debug!("go_to_offset({offset}) out of range");
            return None;
        }
        let target = as_signed(self.current_index) + offset;
        if self.in_run(target as usize) {
            self.pending_index = Some(target as usize);
            Some(Traversal::InPlaceOffset(offset))
        } else {
            self.go_to_index(target)
        }
    }

    /// Reload the committed entry. No-op when nothing is committed.
    pub fn reload(&mut self) -> Option<Traversal> {
        self.reload_with(LoadOptions::default())
    }

    pub fn reload_ignoring_cache(&mut self) -> Option<Traversal> {
        self.reload_with(LoadOptions::bypass_cache())
    }

    /// Remove a non-active entry. Returns whether anything was removed.
    pub fn remove_entry_at(&mut self, index: isize) -> bool {
        let Some(index) = self.checked_index(index) else {
            return false;
        };
        if Some(index) == self.active_index() || Some(index) == self.current_index {
            return false;
        }
        self.history.remove(index);
        self.current_index = self.current_index.map(|i| shift_down(i, index));
        self.pending_index = self.pending_index.map(|i| shift_down(i, index));
        // The surface's own same-document list no longer matches.
        self.in_page_index = match self.in_page_index {
            Some(start) if index >= start => None,
            other => other.map(|i| shift_down(i, index)),
        };
        log::debug!("Removed history entry {index}");
        true
    }

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    fn checked_index(&self, index: isize) -> Option<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.history.len())
    }

    fn in_run(&self, target: usize) -> bool {
        self.in_page_index.is_some_and(|start| target >= start)
    }

    fn load_entry(&self, index: usize) -> Option<Traversal> {
        let url = self.history.get(index)?.clone();
        Some(Traversal::Load {
            url,
            options: LoadOptions::default(),
        })
    }

    fn reload_with(&mut self, options: LoadOptions) -> Option<Traversal> {
        let current = self.current_index?;
        self.pending_index = Some(current);
        Some(Traversal::Load {
            url: self.history[current].clone(),
            options,
        })
    }
}

fn as_signed(index: Option<usize>) -> isize {
    index.map_or(-1, |i| i as isize)
}

fn shift_down(i: usize, removed: usize) -> usize {
    if i > removed { i - 1 } else { i }
}
