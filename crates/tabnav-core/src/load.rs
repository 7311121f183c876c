//! Load settlement: turns a load request into a [`LoadPromise`].
//!
//! Each `load_url` call registers a watcher that observes surface events
//! until the first of finish, main-frame failure, superseding main-frame
//! navigation, or stop-loading settles it. A settled watcher is removed
//! immediately, so a promise settles at most once.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use tabnav_types::error::LoadError;

use crate::surface::SurfaceEvent;

/// Outcome of a page load.
pub type LoadOutcome = Result<(), LoadError>;

// -----------------------------------------------------------------------
// LoadPromise
// -----------------------------------------------------------------------

/// Resolves when the load it was created for settles.
///
/// Dropping a promise without awaiting it is fine: the settlement is
/// simply discarded. If the controller is dropped first, the promise
/// resolves to [`LoadError::Detached`].
#[derive(Debug)]
pub struct LoadPromise {
    rx: oneshot::Receiver<LoadOutcome>,
    outcome: Option<LoadOutcome>,
}

impl LoadPromise {
    fn new(rx: oneshot::Receiver<LoadOutcome>) -> Self {
        Self { rx, outcome: None }
    }

    /// Non-blocking check for hosts that pump events on their own loop.
    ///
    /// Returns the outcome once settled, and keeps returning it.
    pub fn try_settle(&mut self) -> Option<&LoadOutcome> {
        if self.outcome.is_none() {
            self.outcome = match self.rx.try_recv() {
                Ok(Some(outcome)) => Some(outcome),
                Ok(None) => None,
                Err(oneshot::Canceled) => Some(Err(LoadError::Detached)),
            };
        }
        self.outcome.as_ref()
    }
}

impl Future for LoadPromise {
    type Output = LoadOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = &self.outcome {
            return Poll::Ready(outcome.clone());
        }
        let outcome = match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => outcome,
            Poll::Ready(Err(oneshot::Canceled)) => Err(LoadError::Detached),
            Poll::Pending => return Poll::Pending,
        };
        self.outcome = Some(outcome.clone());
        Poll::Ready(outcome)
    }
}

// -----------------------------------------------------------------------
// LoadWatcher
// -----------------------------------------------------------------------

/// Bookkeeping for one in-flight load.
#[derive(Debug)]
struct LoadWatcher {
    url: String,
    /// Main-frame starts already queued when this load was requested;
    /// they belong to earlier navigations.
    earlier_starts: usize,
    /// Whether this load's own main-frame navigation has been seen.
    navigation_started: bool,
    tx: oneshot::Sender<LoadOutcome>,
}

impl LoadWatcher {
    /// Feed one event; returns the outcome if it settles this load.
    fn observe(&mut self, event: &SurfaceEvent) -> Option<LoadOutcome> {
        match event {
            SurfaceEvent::FinishLoad => Some(Ok(())),
            SurfaceEvent::FailLoad {
                code,
                description,
                validated_url,
                is_main_frame: true,
            } => Some(Err(LoadError::Failed {
                code: *code,
                description: description.clone(),
                url: validated_url.clone(),
            })),
            SurfaceEvent::StartNavigation {
                url,
                is_same_document,
                is_main_frame: true,
            } => {
                if self.earlier_starts > 0 {
                    self.earlier_starts -= 1;
                    return None;
                }
                if self.navigation_started && !is_same_document {
                    return Some(Err(LoadError::Aborted { url: url.clone() }));
                }
                self.navigation_started = true;
                None
            },
            SurfaceEvent::StopLoading => Some(Err(LoadError::Stopped {
                url: self.url.clone(),
            })),
            _ => None,
        }
    }

    fn settle(self, outcome: LoadOutcome) {
        match &outcome {
            Ok(()) => log::info!("Loaded {}", self.url),
            Err(e) if e.is_aborted() => log::debug!("Load of {} superseded: {e}", self.url),
            Err(e) => log::warn!("Load of {} failed: {e}", self.url),
        }
        // The caller may have discarded the promise.
        let _ = self.tx.send(outcome);
    }
}

// -----------------------------------------------------------------------
// LoadCoordinator
// -----------------------------------------------------------------------

/// All loads that have not settled yet.
#[derive(Debug, Default)]
pub struct LoadCoordinator {
    watchers: Vec<LoadWatcher>,
}

impl LoadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching a load of `url`.
    pub fn begin(&mut self, url: &str) -> LoadPromise {
        self.begin_behind(url, 0)
    }

    /// Start watching a load of `url` on a surface that still has
    /// `queued_starts` earlier navigation starts waiting to be delivered.
    pub fn begin_behind(&mut self, url: &str, queued_starts: usize) -> LoadPromise {
        let (tx, rx) = oneshot::channel();
        self.watchers.push(LoadWatcher {
            url: url.to_string(),
            earlier_starts: queued_starts,
            navigation_started: false,
            tx,
        });
        LoadPromise::new(rx)
    }

    /// Route one surface event to every unsettled load.
    pub fn observe(&mut self, event: &SurfaceEvent) {
        if self.watchers.is_empty() {
            return;
        }
        for mut watcher in std::mem::take(&mut self.watchers) {
            match watcher.observe(event) {
                Some(outcome) => watcher.settle(outcome),
                None => self.watchers.push(watcher),
            }
        }
    }

    /// Number of loads still waiting to settle.
    pub fn in_flight(&self) -> usize {
        self.watchers.len()
    }
}
