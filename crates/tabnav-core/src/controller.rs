//! Navigation controller: history bookkeeping and load settlement for one
//! surface.
//!
//! The surface's own history is bypassed. Every traversal outside an
//! in-page run is issued as a fresh load, so the surface's backing process
//! can be replaced between navigations without losing history.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tabnav_types::config::NavConfig;
use tabnav_types::error::{NavError, Result};

use crate::history::{HistoryStore, Traversal};
use crate::load::{LoadCoordinator, LoadPromise};
use crate::surface::{LoadOptions, Surface, SurfaceEvent};

/// Extra URL parts for [`NavigationController::load_file`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoadOptions {
    /// Query parameters, form-encoded in order.
    pub query: Vec<(String, String)>,
    /// Raw query string; takes precedence over `query`.
    pub search: Option<String>,
    /// Fragment, with or without the leading `#`.
    pub hash: Option<String>,
}

/// Owns the history of one surface and drives its navigation primitives.
///
/// Events must be delivered one at a time, in the surface's emission
/// order, through [`handle_event`](Self::handle_event) or
/// [`pump`](Self::pump).
pub struct NavigationController<S: Surface> {
    surface: S,
    history: HistoryStore,
    loads: LoadCoordinator,
    config: NavConfig,
}

impl<S: Surface> NavigationController<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, NavConfig::default())
    }

    /// Create a controller, seeding history with whatever the surface
    /// already displays.
    pub fn with_config(surface: S, config: NavConfig) -> Self {
        let history = HistoryStore::primed(&surface.current_url());
        Self {
            surface,
            history,
            loads: LoadCoordinator::new(),
            config,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Loads still waiting on the surface.
    pub fn loads_in_flight(&self) -> usize {
        self.loads.in_flight()
    }

    // -------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------

    /// Apply one surface notification.
    pub fn handle_event(&mut self, event: &SurfaceEvent) {
        if let SurfaceEvent::NavigationCommitted {
            url,
            is_in_page,
            is_replace,
        } = event
        {
            self.history
                .on_navigation_committed(url, *is_in_page, *is_replace);
        }
        self.loads.observe(event);
    }

    /// Drain and apply every event the surface has queued.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.surface.poll_event() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }

    // -------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------

    /// Load a new URL. The returned promise settles on finish, failure,
    /// supersession by another navigation, or a bare stop.
    pub fn load_url(&mut self, url: &str, options: LoadOptions) -> LoadPromise {
        self.history.reset_pending();
        let promise = self.loads.begin_behind(url, self.surface.queued_starts());
        log::info!("Loading {url}");
        self.surface.navigate(url, &options);
        promise
    }

    /// Load a local file, resolving relative paths against `app_root`.
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        options: &FileLoadOptions,
    ) -> Result<LoadPromise> {
        let resolved = normalize(&std::path::absolute(
            self.config.resolve_path(path.as_ref()),
        )?);
        let mut url = url::Url::from_file_path(&resolved)
            .map_err(|()| NavError::InvalidFilePath(resolved.display().to_string()))?;
        if let Some(search) = &options.search {
            url.set_query(Some(search.trim_start_matches('?')));
        } else if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.query);
        }
        if let Some(hash) = &options.hash {
            url.set_fragment(Some(hash.trim_start_matches('#')));
        }
        Ok(self.load_url(url.as_str(), LoadOptions::default()))
    }

    pub fn stop(&mut self) {
        self.surface.stop();
    }

    pub fn reload(&mut self) {
        let traversal = self.history.reload();
        self.apply(traversal);
    }

    pub fn reload_ignoring_cache(&mut self) {
        let traversal = self.history.reload_ignoring_cache();
        self.apply(traversal);
    }

    // -------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------

    /// Committed URL, or `""`.
    pub fn url(&self) -> &str {
        self.history.url()
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    pub fn can_go_to_index(&self, index: isize) -> bool {
        self.history.can_go_to_index(index)
    }

    pub fn can_go_to_offset(&self, offset: isize) -> bool {
        self.history.can_go_to_offset(offset)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn go_back(&mut self) {
        let traversal = self.history.go_back();
        self.apply(traversal);
    }

    pub fn go_forward(&mut self) {
        let traversal = self.history.go_forward();
        self.apply(traversal);
    }

    pub fn go_to_index(&mut self, index: isize) {
        let traversal = self.history.go_to_index(index);
        self.apply(traversal);
    }

    pub fn go_to_offset(&mut self, offset: isize) {
        let traversal = self.history.go_to_offset(offset);
        self.apply(traversal);
    }

    pub fn active_index(&self) -> Option<usize> {
        self.history.active_index()
    }

    pub fn length(&self) -> usize {
        self.history.len()
    }

    pub fn entry_at_index(&self, index: isize) -> Option<&str> {
        self.history.entry_at(index)
    }

    pub fn remove_entry_at_index(&mut self, index: isize) -> bool {
        self.history.remove_entry_at(index)
    }

    fn apply(&mut self, traversal: Option<Traversal>) {
        let Some(traversal) = traversal else { return };
        log::debug!("Traversal {traversal:?}");
        match traversal {
            Traversal::InPlaceBack => self.surface.go_back_in_place(),
            Traversal::InPlaceForward => self.surface.go_forward_in_place(),
            Traversal::InPlaceOffset(offset) => self.surface.go_to_offset_in_place(offset),
            Traversal::Load { url, options } => self.surface.navigate(&url, &options),
        }
    }
}

/// Collapse `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                out.pop();
            },
            other => out.push(other),
        }
    }
    out
}
