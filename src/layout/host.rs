//! Host seam - the docking primitives the layout engine consumes
//!
//! A toolkit integration implements `DockHost` over its own widgets; the
//! crate's `DockTree` arena implements it for headless use and tests.

use crate::error::{LayoutError, Result};
use crate::model::{DockTree, FloatingLeaf, NodeId, NodeKind, Owner, StationId};
use crate::panel::{Geometry, Orientation};

/// How the serializer sees a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeClass<'a> {
    Splitter {
        orientation: Orientation,
        dividers: &'a [f64],
        first: Option<NodeId>,
        second: Option<NodeId>,
    },
    Tabber {
        tabs: &'a [NodeId],
    },
    SubStation {
        name: &'a str,
        station: StationId,
    },
    Leaf {
        name: &'a str,
    },
    /// Wrapper without semantic meaning; its children are flattened into the
    /// nearest semantic ancestor
    Passthrough {
        children: &'a [NodeId],
    },
}

pub trait DockHost {
    // Reads, used by the serializer

    fn station_root(&self, station: StationId) -> Result<Option<NodeId>>;

    fn classify(&self, node: NodeId) -> Result<NodeClass<'_>>;

    fn floating_leaves(&self, station: StationId) -> Result<Vec<FloatingLeaf>>;

    fn leaf_name(&self, leaf: NodeId) -> Option<&str>;

    // Primitives, used by the rebuilder

    /// Detach every leaf under `station` (nested sub-stations and floating
    /// leaves included) and hand back the same leaf instances
    fn undock_all(&mut self, station: StationId) -> Result<Vec<NodeId>>;

    fn attach_leaf(&mut self, station: StationId, leaf: NodeId) -> Result<()>;

    fn create_splitter(
        &mut self,
        first: Option<NodeId>,
        second: Option<NodeId>,
        orientation: Orientation,
        divider: f64,
    ) -> Result<NodeId>;

    /// Compose a tab group with front-insert-and-select semantics: the last
    /// tab handed in ends up first and selected
    fn create_tabber(&mut self, tabs: Vec<NodeId>) -> Result<NodeId>;

    /// Create a named sub-station in the context of `parent`; returns the
    /// sub-station node and its nested station
    fn create_sub_station(&mut self, parent: StationId, name: &str) -> Result<(NodeId, StationId)>;

    fn set_station_root(&mut self, station: StationId, root: Option<NodeId>) -> Result<()>;

    fn set_owner(&mut self, node: NodeId, owner: Owner) -> Result<()>;

    fn float_leaf(&mut self, station: StationId, leaf: NodeId, geometry: Geometry) -> Result<()>;
}

impl DockHost for DockTree {
    fn station_root(&self, station: StationId) -> Result<Option<NodeId>> {
        self.station(station)
            .map(|s| s.root)
            .ok_or(LayoutError::UnknownStation(station))
    }

    fn classify(&self, node: NodeId) -> Result<NodeClass<'_>> {
        let entry = self.node(node).ok_or(LayoutError::DanglingNode(node))?;
        Ok(match &entry.kind {
            NodeKind::Splitter(split) => NodeClass::Splitter {
                orientation: split.orientation,
                dividers: std::slice::from_ref(&split.divider),
                first: split.first(),
                second: split.second(),
            },
            NodeKind::Tabber(tabber) => NodeClass::Tabber { tabs: &tabber.tabs },
            NodeKind::SubStation(sub) => NodeClass::SubStation {
                name: &sub.name,
                station: sub.station,
            },
            NodeKind::Leaf(leaf) => NodeClass::Leaf {
                name: &leaf.panel.title,
            },
            NodeKind::Passthrough(children) => NodeClass::Passthrough { children },
        })
    }

    fn floating_leaves(&self, station: StationId) -> Result<Vec<FloatingLeaf>> {
        self.station(station)
            .map(|s| s.floating.clone())
            .ok_or(LayoutError::UnknownStation(station))
    }

    fn leaf_name(&self, leaf: NodeId) -> Option<&str> {
        self.title(leaf)
    }

    fn undock_all(&mut self, station: StationId) -> Result<Vec<NodeId>> {
        DockTree::undock_all(self, station)
    }

    fn attach_leaf(&mut self, station: StationId, leaf: NodeId) -> Result<()> {
        DockTree::attach_leaf(self, station, leaf)
    }

    fn create_splitter(
        &mut self,
        first: Option<NodeId>,
        second: Option<NodeId>,
        orientation: Orientation,
        divider: f64,
    ) -> Result<NodeId> {
        Ok(DockTree::create_splitter(
            self,
            first,
            second,
            orientation,
            divider,
        ))
    }

    fn create_tabber(&mut self, tabs: Vec<NodeId>) -> Result<NodeId> {
        Ok(DockTree::create_tabber(self, tabs))
    }

    fn create_sub_station(&mut self, parent: StationId, name: &str) -> Result<(NodeId, StationId)> {
        DockTree::create_sub_station(self, parent, name)
    }

    fn set_station_root(&mut self, station: StationId, root: Option<NodeId>) -> Result<()> {
        self.set_root(station, root)
    }

    fn set_owner(&mut self, node: NodeId, owner: Owner) -> Result<()> {
        DockTree::set_owner(self, node, Some(owner))
    }

    fn float_leaf(&mut self, station: StationId, leaf: NodeId, geometry: Geometry) -> Result<()> {
        DockTree::float_leaf(self, station, leaf, geometry)
    }
}
