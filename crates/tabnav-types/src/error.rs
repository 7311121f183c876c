//! Error types for tabnav.

use std::io;

/// Longest URL reproduced in a load error message.
pub const MAX_ERROR_URL_CHARS: usize = 2048;

/// Engine code reported when a load is superseded by another navigation.
pub const ERR_ABORTED_CODE: i32 = -3;
/// Symbolic name paired with [`ERR_ABORTED_CODE`].
pub const ERR_ABORTED: &str = "ERR_ABORTED";

/// Engine code reported when loading stops without a finish or failure.
pub const ERR_FAILED_CODE: i32 = -2;
/// Symbolic name paired with [`ERR_FAILED_CODE`].
pub const ERR_FAILED: &str = "ERR_FAILED";

/// Errors produced by setup and command paths.
///
/// Navigation operations themselves never fail; see [`LoadError`] for
/// the outcome of a page load.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid file path: {0}")]
    InvalidFilePath(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, NavError>;

/// Why a page load did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The engine reported a main-frame failure.
    #[error("{description} ({code}) loading '{}'", display_url(.url))]
    Failed {
        code: i32,
        description: String,
        url: String,
    },

    /// Another main-frame navigation started first. `url` is the URL of
    /// that newer navigation.
    #[error("ERR_ABORTED (-3) loading '{}'", display_url(.url))]
    Aborted { url: String },

    /// Loading stopped without the engine classifying the outcome
    /// (bad scheme, explicit stop).
    #[error("ERR_FAILED (-2) loading '{}'", display_url(.url))]
    Stopped { url: String },

    /// The controller went away before the load settled.
    #[error("navigation controller dropped before the load settled")]
    Detached,
}

impl LoadError {
    /// Numeric engine code.
    pub fn code(&self) -> i32 {
        match self {
            Self::Failed { code, .. } => *code,
            Self::Aborted { .. } => ERR_ABORTED_CODE,
            Self::Stopped { .. } | Self::Detached => ERR_FAILED_CODE,
        }
    }

    /// Symbolic engine description, e.g. `ERR_FILE_NOT_FOUND`.
    pub fn description(&self) -> &str {
        match self {
            Self::Failed { description, .. } => description,
            Self::Aborted { .. } => ERR_ABORTED,
            Self::Stopped { .. } | Self::Detached => ERR_FAILED,
        }
    }

    /// The URL the error refers to, untruncated.
    pub fn url(&self) -> &str {
        match self {
            Self::Failed { url, .. } | Self::Aborted { url } | Self::Stopped { url } => url,
            Self::Detached => "",
        }
    }

    /// Superseded loads are routine during rapid navigation.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

fn display_url(url: &str) -> String {
    url.chars().take(MAX_ERROR_URL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let e = NavError::Config("missing key".into());
        assert_eq!(format!("{e}"), "config error: missing key");
    }

    #[test]
    fn command_error_display() {
        let e = NavError::Command("unknown cmd".into());
        assert_eq!(format!("{e}"), "command error: unknown cmd");
    }

    #[test]
    fn failed_load_display() {
        let e = LoadError::Failed {
            code: -6,
            description: "ERR_FILE_NOT_FOUND".into(),
            url: "file:///non-existent".into(),
        };
        assert_eq!(
            format!("{e}"),
            "ERR_FILE_NOT_FOUND (-6) loading 'file:///non-existent'"
        );
        assert_eq!(e.code(), -6);
        assert_eq!(e.description(), "ERR_FILE_NOT_FOUND");
        assert_eq!(e.url(), "file:///non-existent");
    }

    #[test]
    fn synthetic_codes() {
        let aborted = LoadError::Aborted {
            url: "https://b".into(),
        };
        assert_eq!(aborted.code(), ERR_ABORTED_CODE);
        assert_eq!(aborted.description(), ERR_ABORTED);
        assert!(aborted.is_aborted());
        assert_eq!(format!("{aborted}"), "ERR_ABORTED (-3) loading 'https://b'");

        let stopped = LoadError::Stopped {
            url: "bad-scheme://foo".into(),
        };
        assert_eq!(stopped.code(), ERR_FAILED_CODE);
        assert_eq!(stopped.description(), ERR_FAILED);
        assert!(!stopped.is_aborted());
    }

    #[test]
    fn long_url_truncated_in_message_only() {
        let url = format!("https://x/{}", "a".repeat(5000));
        let e = LoadError::Stopped { url: url.clone() };
        let msg = format!("{e}");
        let quoted = msg
            .strip_prefix("ERR_FAILED (-2) loading '")
            .and_then(|s| s.strip_suffix('\''))
            .unwrap();
        assert_eq!(quoted.chars().count(), MAX_ERROR_URL_CHARS);
        assert_eq!(e.url(), url);
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(NavError::InvalidFilePath("rel".into()));
        assert!(r.is_err());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_never_exceeds_limit(tail in "[a-z0-9/]{0,4000}") {
                let url = format!("https://{tail}");
                let msg = format!("{}", LoadError::Aborted { url });
                let prefix = "ERR_ABORTED (-3) loading '".chars().count();
                prop_assert!(msg.chars().count() <= prefix + MAX_ERROR_URL_CHARS + 1);
            }
        }
    }
}
