//! Controller configuration (from `tabnav.toml`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{NavError, Result};

/// Runtime configuration for a navigation controller and its host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NavConfig {
    /// URL loaded at startup. Empty = start with no history.
    #[serde(default)]
    pub home_url: String,
    /// Base directory for relative `load_file` paths.
    #[serde(default = "default_app_root")]
    pub app_root: PathBuf,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_app_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            home_url: String::new(),
            app_root: default_app_root(),
            log_filter: default_log_filter(),
        }
    }
}

impl NavConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.log_filter.trim().is_empty() {
            return Err(NavError::Config("log_filter must not be empty".into()));
        }
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve `path` against `app_root` unless it is already absolute.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.app_root.join(path)
        }
    }
}
