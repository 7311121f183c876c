//! Shared test utilities for the navigation core.
//!
//! Provides a [`RecordingSurface`] that records every request made of it,
//! plus shorthand constructors for the events a real surface would emit.

use crate::surface::{LoadOptions, Surface, SurfaceEvent};

/// A recorded request made of the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Navigate { url: String, options: LoadOptions },
    Stop,
    BackInPlace,
    ForwardInPlace,
    OffsetInPlace(isize),
}

/// A surface that only records calls. Tests feed events to the controller
/// by hand.
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    current_url: String,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::showing("")
    }

    /// A surface that already displays `url`.
    pub fn showing(url: &str) -> Self {
        Self {
            calls: Vec::new(),
            current_url: url.to_string(),
        }
    }

    pub fn last_call(&self) -> Option<&SurfaceCall> {
        self.calls.last()
    }
}

impl Surface for RecordingSurface {
    fn current_url(&self) -> String {
        self.current_url.clone()
    }

    fn navigate(&mut self, url: &str, options: &LoadOptions) {
        self.calls.push(SurfaceCall::Navigate {
            url: url.to_string(),
            options: options.clone(),
        });
    }

    fn stop(&mut self) {
        self.calls.push(SurfaceCall::Stop);
    }

    fn go_back_in_place(&mut self) {
        self.calls.push(SurfaceCall::BackInPlace);
    }

    fn go_forward_in_place(&mut self) {
        self.calls.push(SurfaceCall::ForwardInPlace);
    }

    fn go_to_offset_in_place(&mut self, offset: isize) {
        self.calls.push(SurfaceCall::OffsetInPlace(offset));
    }
}

/// Main-frame, cross-document navigation start.
pub fn start(url: &str) -> SurfaceEvent {
    SurfaceEvent::StartNavigation {
        url: url.to_string(),
        is_same_document: false,
        is_main_frame: true,
    }
}

pub fn commit(url: &str, is_in_page: bool, is_replace: bool) -> SurfaceEvent {
    SurfaceEvent::NavigationCommitted {
        url: url.to_string(),
        is_in_page,
        is_replace,
    }
}

pub fn finish() -> SurfaceEvent {
    SurfaceEvent::FinishLoad
}

pub fn stop() -> SurfaceEvent {
    SurfaceEvent::StopLoading
}
