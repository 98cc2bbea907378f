//! Dock tree model
//!
//! The live docking arrangement: stations, splitters, tab groups,
//! sub-stations and leaves, stored in an id-keyed arena.

pub mod tree;

pub use tree::{
    DockNode, DockTarget, DockTree, FloatingLeaf, LeafNode, NodeId, NodeKind, Owner,
    SplitterContainer, Station, StationId, SubStationNode, TabberContainer,
};
