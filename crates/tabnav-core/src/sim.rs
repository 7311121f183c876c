//! An in-memory surface that emits a believable event sequence for each
//! request, for hosts and tests that have no real engine.

use std::collections::VecDeque;

use url::Url;

use crate::surface::{LoadOptions, Surface, SurfaceEvent};

/// Schemes the simulated engine knows how to load.
const KNOWN_SCHEMES: &[&str] = &["http", "https", "file", "data", "about"];

/// Simulated engine state: what is displayed, the same-document entries
/// of the displayed document, and the event queue.
#[derive(Debug, Default)]
pub struct SimulatedSurface {
    /// Same-document entries of the current document; the first entry is
    /// the document's own URL.
    session: Vec<String>,
    session_index: usize,
    events: VecDeque<SurfaceEvent>,
    /// A load's stop-loading has not been handed out yet.
    loading: bool,
    /// Session as it was before the in-flight load touched it.
    rollback: Option<(Vec<String>, usize)>,
    /// URL prefixes whose loads start but never complete.
    stalled: Vec<String>,
    /// Requests received, newest last.
    requests: Vec<String>,
}

impl SimulatedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of URLs starting with `prefix` hang after starting.
    pub fn stall(&mut self, prefix: &str) {
        self.stalled.push(prefix.to_string());
    }

    /// Every URL passed to `navigate`, oldest first.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    fn displayed(&self) -> Option<&str> {
        self.session.get(self.session_index).map(String::as_str)
    }

    fn emit(&mut self, event: SurfaceEvent) {
        self.events.push_back(event);
    }

    /// Cancel the in-flight load: its undelivered commit, finish, failure
    /// and stop are dropped and the session goes back to what the
    /// controller last saw. Starts already emitted stay queued.
    fn abandon_load(&mut self) {
        if !self.loading {
            return;
        }
        self.loading = false;
        self.events
            .retain(|event| matches!(event, SurfaceEvent::StartNavigation { .. }));
        if let Some((session, index)) = self.rollback.take() {
            self.session = session;
            self.session_index = index;
        }
    }

    fn start(&mut self, url: &str, is_same_document: bool) {
        self.emit(SurfaceEvent::StartNavigation {
            url: url.to_string(),
            is_same_document,
            is_main_frame: true,
        });
    }

    fn fail(&mut self, code: i32, description: &str, url: &str) {
        self.emit(SurfaceEvent::FailLoad {
            code,
            description: description.to_string(),
            validated_url: url.to_string(),
            is_main_frame: true,
        });
        self.emit(SurfaceEvent::StopLoading);
    }

    fn commit_document(&mut self, url: &str) {
        self.session = vec![url.to_string()];
        self.session_index = 0;
        self.emit(SurfaceEvent::NavigationCommitted {
            url: url.to_string(),
            is_in_page: false,
            is_replace: false,
        });
        self.emit(SurfaceEvent::FinishLoad);
        self.emit(SurfaceEvent::StopLoading);
    }

    fn commit_fragment(&mut self, url: &str) {
        self.session.truncate(self.session_index + 1);
        self.session.push(url.to_string());
        self.session_index += 1;
        self.emit(SurfaceEvent::NavigationCommitted {
            url: url.to_string(),
            is_in_page: true,
            is_replace: false,
        });
        self.emit(SurfaceEvent::FinishLoad);
        self.emit(SurfaceEvent::StopLoading);
    }

    /// Move within the displayed document's same-document entries.
    fn traverse(&mut self, offset: isize) {
        let Some(target) = self
            .session_index
            .checked_add_signed(offset)
            .filter(|&i| i < self.session.len())
        else {
            return;
        };
        if self.loading && self.rollback.is_none() {
            self.rollback = Some((self.session.clone(), self.session_index));
        }
        self.session_index = target;
        let url = self.session[target].clone();
        self.start(&url, true);
        self.emit(SurfaceEvent::NavigationCommitted {
            url,
            is_in_page: true,
            is_replace: false,
        });
    }

    fn is_same_document(&self, target: &Url) -> bool {
        let Some(current) = self.displayed().and_then(|u| Url::parse(u).ok()) else {
            return false;
        };
        target.fragment().is_some()
            && current[..url::Position::AfterQuery] == target[..url::Position::AfterQuery]
    }
}

impl Surface for SimulatedSurface {
    fn current_url(&self) -> String {
        self.displayed().unwrap_or_default().to_string()
    }

    fn navigate(&mut self, url: &str, _options: &LoadOptions) {
        self.requests.push(url.to_string());
        self.abandon_load();
        self.loading = true;
        self.rollback = Some((self.session.clone(), self.session_index));

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => {
                self.start(url, false);
                self.fail(-300, "ERR_INVALID_URL", url);
                return;
            },
        };
        let url = parsed.as_str();

        if self.is_same_document(&parsed) {
            self.start(url, true);
            self.commit_fragment(url);
            return;
        }

        self.start(url, false);
        if self.stalled.iter().any(|prefix| url.starts_with(prefix)) {
            return;
        }
        if !KNOWN_SCHEMES.contains(&parsed.scheme()) {
            self.emit(SurfaceEvent::StopLoading);
            return;
        }
        if parsed.scheme() == "file" {
            let exists = parsed.to_file_path().is_ok_and(|path| path.exists());
            if !exists {
                self.fail(-6, "ERR_FILE_NOT_FOUND", url);
                return;
            }
        }
        self.commit_document(url);
    }

    fn stop(&mut self) {
        if !self.loading {
            return;
        }
        self.abandon_load();
        self.emit(SurfaceEvent::StopLoading);
    }

    fn go_back_in_place(&mut self) {
        self.traverse(-1);
    }

    fn go_forward_in_place(&mut self) {
        self.traverse(1);
    }

    fn go_to_offset_in_place(&mut self, offset: isize) {
        self.traverse(offset);
    }

    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        let event = self.events.pop_front()?;
        match &event {
            // Once the controller has seen the commit there is nothing to
            // roll back to.
            SurfaceEvent::NavigationCommitted { .. } => self.rollback = None,
            SurfaceEvent::StopLoading if !self.events.contains(&SurfaceEvent::StopLoading) => {
                self.loading = false;
                self.rollback = None;
            },
            _ => {},
        }
        Some(event)
    }

    fn queued_starts(&self) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    SurfaceEvent::StartNavigation {
                        is_main_frame: true,
                        ..
                    }
                )
            })
            .count()
    }
}
