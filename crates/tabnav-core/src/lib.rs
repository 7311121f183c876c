//! Navigation history and load settlement for a browser-tab surface.
//!
//! The [`NavigationController`] keeps its own history list instead of
//! trusting the engine's, reconciling three inputs into it: explicit
//! navigation commands, the surface's committed-navigation notifications,
//! and same-document navigations. Page loads are turned into
//! [`LoadPromise`]s that settle on the first decisive lifecycle signal.

pub mod commands;
pub mod controller;
pub mod history;
pub mod load;
pub mod sim;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use commands::{CommandReply, NavCommand};
pub use controller::{FileLoadOptions, NavigationController};
pub use history::{HistoryStore, Traversal};
pub use load::{LoadCoordinator, LoadOutcome, LoadPromise};
pub use sim::SimulatedSurface;
pub use surface::{LoadOptions, Surface, SurfaceEvent};
pub use tabnav_types::{LoadError, NavConfig, NavError};
