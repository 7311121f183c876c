//! Foundation types for tabnav.
//!
//! Shared by the core and the host binary: the error enums surfaced by
//! page loads and setup paths, and the controller configuration.

pub mod config;
pub mod error;

pub use config::NavConfig;
pub use error::{LoadError, NavError, Result};
