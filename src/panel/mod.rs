//! Panel vocabulary - leaf content and docking directions
//!
//! This module holds the small value types shared by the dock tree and the
//! layout persistence engine.
//!
//! ## Architecture
//!
//! - `Panel`: the named, content-bearing leaf a host docks somewhere
//! - `DockPosition`: Center (tab) or one of the four split sides
//! - `Orientation`: axis of a splitter, written as `HORIZONTAL` / `VERTICAL`
//! - `Geometry`: absolute placement of a floating leaf
//!
//! ## Integration
//!
//! - `DockTree::dock()` in `model/tree.rs` consumes `DockPosition`
//! - The serializer writes `Orientation::as_str()` and `Geometry` attributes
//! - The rebuilder parses them back with `Orientation::parse()`

mod dock;

pub use dock::{DockPosition, Geometry, Orientation, Panel};
