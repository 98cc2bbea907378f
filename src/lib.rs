//! Dockyard - docking layout persistence
//!
//! This crate captures the runtime tree of docked panels, splitters, tab
//! groups and sub-stations as a layout document, and rebuilds an equivalent
//! arrangement from it by re-attaching pre-existing named panels.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod dump;
pub mod error;
pub mod layout;
pub mod model;
pub mod panel;
pub mod registry;
pub mod tracing;

// Re-export commonly used types
pub use config::DockyardConfig;
pub use error::{LayoutError, Result};
pub use layout::{
    restore_layout, save_layout, try_restore_layout, try_save_layout, DockHost, LayoutDocument,
    Restored, SaveOptions,
};
pub use model::{DockTree, NodeId, StationId};
pub use registry::{DragOutcome, StationRegistry};
