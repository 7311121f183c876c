//! The browsing surface being navigated: its primitives and notifications.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Header set by a reload that must bypass the cache.
pub const NO_CACHE_HEADERS: &str = "pragma: no-cache\n";

/// Options relayed verbatim to [`Surface::navigate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    pub post_data: Option<Vec<u8>>,
    pub base_url_for_data_url: Option<String>,
    pub extra_headers: Option<String>,
    pub http_referrer: Option<String>,
    /// Any further keys the host understands.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl LoadOptions {
    /// Options for a reload that skips cached responses.
    pub fn bypass_cache() -> Self {
        Self {
            extra_headers: Some(NO_CACHE_HEADERS.to_string()),
            ..Self::default()
        }
    }
}

/// A lifecycle notification emitted by the surface.
///
/// Delivered one at a time, in emission order. For a given navigation,
/// `StartNavigation` precedes `FinishLoad`/`FailLoad`, and `StopLoading`
/// comes last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A main-frame navigation was committed.
    NavigationCommitted {
        url: String,
        is_in_page: bool,
        is_replace: bool,
    },
    /// The main-frame load completed.
    FinishLoad,
    FailLoad {
        code: i32,
        description: String,
        validated_url: String,
        is_main_frame: bool,
    },
    /// Fired for every navigation attempt, same-document ones included.
    StartNavigation {
        url: String,
        is_same_document: bool,
        is_main_frame: bool,
    },
    StopLoading,
}

/// The rendering/browsing context a controller drives.
///
/// All requests are fire-and-forget; outcomes come back as
/// [`SurfaceEvent`]s.
pub trait Surface {
    /// The presently committed URL, or empty.
    fn current_url(&self) -> String;

    /// Begin loading `url`.
    fn navigate(&mut self, url: &str, options: &LoadOptions);

    /// Halt any in-flight navigation.
    fn stop(&mut self);

    fn go_back_in_place(&mut self);

    fn go_forward_in_place(&mut self);

    fn go_to_offset_in_place(&mut self, offset: isize);

    /// Next queued notification, for surfaces that buffer their events.
    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        None
    }

    /// Main-frame `StartNavigation`s emitted but not yet returned by
    /// [`poll_event`](Self::poll_event). Surfaces that deliver events
    /// as they happen always report zero.
    fn queued_starts(&self) -> usize {
        0
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn current_url(&self) -> String {
        (**self).current_url()
    }

    fn navigate(&mut self, url: &str, options: &LoadOptions) {
        (**self).navigate(url, options);
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn go_back_in_place(&mut self) {
        (**self).go_back_in_place();
    }

    fn go_forward_in_place(&mut self) {
        (**self).go_forward_in_place();
    }

    fn go_to_offset_in_place(&mut self, offset: isize) {
        (**self).go_to_offset_in_place(offset);
    }

    fn poll_event(&mut self) -> Option<SurfaceEvent> {
        (**self).poll_event()
    }

    fn queued_starts(&self) -> usize {
        (**self).queued_starts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_cache_sets_pragma() {
        let opts = LoadOptions::bypass_cache();
        assert_eq!(opts.extra_headers.as_deref(), Some("pragma: no-cache\n"));
        assert!(opts.post_data.is_none());
        assert!(opts.http_referrer.is_none());
    }

    #[test]
    fn options_pass_through_unknown_keys() {
        let json = r#"{
            "post_data": null,
            "base_url_for_data_url": null,
            "extra_headers": null,
            "http_referrer": "https://ref/",
            "extra": { "user_agent": "tabnav" }
        }"#;
        let opts: LoadOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.http_referrer.as_deref(), Some("https://ref/"));
        assert_eq!(opts.extra["user_agent"], "tabnav");
    }
}
