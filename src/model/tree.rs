//! Dock tree - stations, containers and leaves
//!
//! This module implements the live, in-memory docking arrangement the layout
//! engine saves and restores. Nodes live in an arena keyed by `NodeId`; each
//! node keeps an `Owner` back-reference so interactive re-docking can walk up
//! the tree.

use std::collections::HashMap;

use crate::error::{LayoutError, Result};
use crate::panel::{DockPosition, Geometry, Orientation, Panel};

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a node (leaf or container)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Unique identifier for a station (top-level or nested in a sub-station)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub u64);

/// What holds a node: a station (as its root) or a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Station(StationId),
    Container(NodeId),
}

/// Target of a dock operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockTarget {
    Station(StationId),
    Node(NodeId),
}

// ============================================================================
// Node kinds
// ============================================================================

/// Two-pane resizable container
#[derive(Debug, Clone)]
pub struct SplitterContainer {
    pub orientation: Orientation,
    /// Fraction of the space given to the first child, in [0, 1]
    pub divider: f64,
    /// First (left/top) and second (right/bottom) child. A restored splitter
    /// may hold one empty slot when a referenced leaf no longer exists.
    pub children: [Option<NodeId>; 2],
}

impl SplitterContainer {
    pub fn first(&self) -> Option<NodeId> {
        self.children[0]
    }

    pub fn second(&self) -> Option<NodeId> {
        self.children[1]
    }
}

/// Container presenting its children as switchable tabs
#[derive(Debug, Clone, Default)]
pub struct TabberContainer {
    pub tabs: Vec<NodeId>,
    pub selected: usize,
}

impl TabberContainer {
    /// Append a tab and select it
    pub fn add_tab(&mut self, tab: NodeId) {
        self.tabs.push(tab);
        self.selected = self.tabs.len() - 1;
    }

    /// Insert a tab in front and select it
    pub fn push_front(&mut self, tab: NodeId) {
        self.tabs.insert(0, tab);
        self.selected = 0;
    }

    pub fn selected_tab(&self) -> Option<NodeId> {
        self.tabs.get(self.selected).copied()
    }

    fn remove_tab(&mut self, tab: NodeId) -> bool {
        let Some(index) = self.tabs.iter().position(|t| *t == tab) else {
            return false;
        };
        self.tabs.remove(index);
        if self.selected > index || self.selected >= self.tabs.len() {
            self.selected = self.selected.saturating_sub(1);
        }
        true
    }
}

/// Named nested dock root
#[derive(Debug, Clone)]
pub struct SubStationNode {
    pub name: String,
    pub station: StationId,
}

/// Content-bearing terminal node
#[derive(Debug, Clone)]
pub struct LeafNode {
    pub panel: Panel,
    /// Station the leaf is attached to (docked or floating)
    pub station: Option<StationId>,
}

/// Node payload
#[derive(Debug, Clone)]
pub enum NodeKind {
    Splitter(SplitterContainer),
    Tabber(TabberContainer),
    SubStation(SubStationNode),
    Leaf(LeafNode),
    /// Layout wrapper without semantic meaning
    Passthrough(Vec<NodeId>),
}

#[derive(Debug, Clone)]
pub struct DockNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub owner: Option<Owner>,
}

impl DockNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn leaf(&self) -> Option<&LeafNode> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Title of a leaf or name of a sub-station
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(&leaf.panel.title),
            NodeKind::SubStation(sub) => Some(&sub.name),
            _ => None,
        }
    }

    /// Direct children in order (a sub-station's nested root is not a child)
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Splitter(split) => split.children.iter().flatten().copied().collect(),
            NodeKind::Tabber(tabber) => tabber.tabs.clone(),
            NodeKind::Passthrough(children) => children.clone(),
            NodeKind::SubStation(_) | NodeKind::Leaf(_) => Vec::new(),
        }
    }
}

// ============================================================================
// Stations
// ============================================================================

/// A leaf detached from the tree, placed at absolute geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingLeaf {
    pub leaf: NodeId,
    pub geometry: Geometry,
}

/// Docking surface owning one root tree and a set of floating leaves
#[derive(Debug, Clone)]
pub struct Station {
    pub id: StationId,
    pub root: Option<NodeId>,
    pub floating: Vec<FloatingLeaf>,
    /// Enclosing station when this one belongs to a sub-station
    pub parent: Option<StationId>,
}

impl Station {
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

// ============================================================================
// Dock tree (arena)
// ============================================================================

#[derive(Debug, Clone)]
pub struct DockTree {
    nodes: HashMap<NodeId, DockNode>,
    stations: HashMap<StationId, Station>,

    /// ID generators
    next_node_id: u64,
    next_station_id: u64,
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DockTree {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            stations: HashMap::new(),
            next_node_id: 1,
            next_station_id: 1,
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn node(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut DockNode> {
        self.nodes.get_mut(&id)
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    fn existing_node(&self, id: NodeId) -> Result<&DockNode> {
        self.nodes.get(&id).ok_or(LayoutError::DanglingNode(id))
    }

    fn existing_node_mut(&mut self, id: NodeId) -> Result<&mut DockNode> {
        self.nodes.get_mut(&id).ok_or(LayoutError::DanglingNode(id))
    }

    fn existing_station_mut(&mut self, id: StationId) -> Result<&mut Station> {
        self.stations
            .get_mut(&id)
            .ok_or(LayoutError::UnknownStation(id))
    }

    /// Root node of a station
    pub fn root(&self, station: StationId) -> Option<NodeId> {
        self.stations.get(&station).and_then(|s| s.root)
    }

    /// Nested station of a sub-station node
    pub fn sub_station_of(&self, node: NodeId) -> Option<StationId> {
        match &self.nodes.get(&node)?.kind {
            NodeKind::SubStation(sub) => Some(sub.station),
            _ => None,
        }
    }

    pub fn owner(&self, node: NodeId) -> Option<Owner> {
        self.nodes.get(&node)?.owner
    }

    pub fn title(&self, leaf: NodeId) -> Option<&str> {
        self.nodes.get(&leaf)?.leaf().map(|l| l.panel.title.as_str())
    }

    /// Find a leaf by title (lowest id wins on duplicates)
    pub fn find_leaf(&self, title: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.leaf().is_some_and(|l| l.panel.title == title))
            .map(|n| n.id)
            .min()
    }

    /// Station a node belongs to, following owner links up to a root
    pub fn station_of(&self, node: NodeId) -> Option<StationId> {
        let mut current = node;
        loop {
            let entry = self.nodes.get(&current)?;
            match entry.owner {
                Some(Owner::Station(station)) => return Some(station),
                Some(Owner::Container(parent)) => current = parent,
                None => return entry.leaf().and_then(|l| l.station),
            }
        }
    }

    /// Floating entry for a leaf, if it is floating anywhere
    pub fn floating_geometry(&self, leaf: NodeId) -> Option<Geometry> {
        self.stations
            .values()
            .flat_map(|s| s.floating.iter())
            .find(|f| f.leaf == leaf)
            .map(|f| f.geometry)
    }

    /// Docked leaves under a station in pre-order, nested sub-stations included
    pub fn docked_leaves(&self, station: StationId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root(station) {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    fn collect_leaves(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let Some(entry) = self.nodes.get(&node) else {
            return;
        };
        match &entry.kind {
            NodeKind::Leaf(_) => out.push(node),
            NodeKind::SubStation(sub) => {
                if let Some(root) = self.root(sub.station) {
                    self.collect_leaves(root, out);
                }
            }
            _ => {
                for child in entry.children() {
                    self.collect_leaves(child, out);
                }
            }
        }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    fn next_station_id(&mut self) -> StationId {
        let id = StationId(self.next_station_id);
        self.next_station_id += 1;
        id
    }

    fn insert_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_node_id();
        self.nodes.insert(
            id,
            DockNode {
                id,
                kind,
                owner: None,
            },
        );
        id
    }

    /// Create an empty top-level station
    pub fn create_station(&mut self) -> StationId {
        self.insert_station(None)
    }

    fn insert_station(&mut self, parent: Option<StationId>) -> StationId {
        let id = self.next_station_id();
        self.stations.insert(
            id,
            Station {
                id,
                root: None,
                floating: Vec::new(),
                parent,
            },
        );
        id
    }

    /// Create an undocked leaf holding `panel`
    pub fn add_leaf(&mut self, panel: Panel) -> NodeId {
        self.insert_node(NodeKind::Leaf(LeafNode {
            panel,
            station: None,
        }))
    }

    /// Create a sub-station node with its own nested station
    pub fn create_sub_station(
        &mut self,
        parent: StationId,
        name: impl Into<String>,
    ) -> Result<(NodeId, StationId)> {
        if !self.stations.contains_key(&parent) {
            return Err(LayoutError::UnknownStation(parent));
        }
        let station = self.insert_station(Some(parent));
        let node = self.insert_node(NodeKind::SubStation(SubStationNode {
            name: name.into(),
            station,
        }));
        Ok((node, station))
    }

    /// Create a splitter over two (possibly absent) children
    ///
    /// Ownership links are left untouched; see `link_station`.
    pub fn create_splitter(
        &mut self,
        first: Option<NodeId>,
        second: Option<NodeId>,
        orientation: Orientation,
        divider: f64,
    ) -> NodeId {
        self.insert_node(NodeKind::Splitter(SplitterContainer {
            orientation,
            divider: divider.clamp(0.0, 1.0),
            children: [first, second],
        }))
    }

    /// Compose a tab group; each tab is inserted in front and selected
    pub fn create_tabber(&mut self, tabs: impl IntoIterator<Item = NodeId>) -> NodeId {
        let mut tabber = TabberContainer::default();
        for tab in tabs {
            tabber.push_front(tab);
        }
        self.insert_node(NodeKind::Tabber(tabber))
    }

    pub fn set_root(&mut self, station: StationId, root: Option<NodeId>) -> Result<()> {
        self.existing_station_mut(station)?.root = root;
        Ok(())
    }

    pub fn set_owner(&mut self, node: NodeId, owner: Option<Owner>) -> Result<()> {
        self.existing_node_mut(node)?.owner = owner;
        Ok(())
    }

    /// Mark a leaf as attached to `station`
    pub fn attach_leaf(&mut self, station: StationId, leaf: NodeId) -> Result<()> {
        if !self.stations.contains_key(&station) {
            return Err(LayoutError::UnknownStation(station));
        }
        match &mut self.existing_node_mut(leaf)?.kind {
            NodeKind::Leaf(entry) => {
                entry.station = Some(station);
                Ok(())
            }
            _ => Err(LayoutError::DanglingNode(leaf)),
        }
    }

    // =========================================================================
    // Docking primitives
    // =========================================================================

    /// Dock a leaf or sub-station node relative to `target`
    ///
    /// `divider` defaults to 0.5 for side docks and is ignored for `Center`.
    pub fn dock(
        &mut self,
        node: NodeId,
        target: DockTarget,
        position: DockPosition,
        divider: Option<f64>,
    ) -> Result<()> {
        if !matches!(
            self.existing_node(node)?.kind,
            NodeKind::Leaf(_) | NodeKind::SubStation(_)
        ) {
            return Err(LayoutError::InvalidDock {
                node,
                reason: "only leaves and sub-stations can be docked",
            });
        }
        if DockTarget::Node(node) == target {
            return Ok(());
        }
        if position == DockPosition::Center {
            self.check_tab_dock(node, target)?;
        }
        self.check_nesting(node, target)?;
        self.undock(node)?;

        let (station, anchor) = match target {
            DockTarget::Station(station) => {
                let root = self
                    .stations
                    .get(&station)
                    .ok_or(LayoutError::UnknownStation(station))?
                    .root;
                (station, root)
            }
            DockTarget::Node(anchor) => {
                self.existing_node(anchor)?;
                let station = self
                    .station_of(anchor)
                    .ok_or(LayoutError::DanglingNode(anchor))?;
                (station, Some(anchor))
            }
        };

        match anchor {
            None => {
                self.set_root(station, Some(node))?;
                self.set_owner(node, Some(Owner::Station(station)))?;
            }
            Some(anchor) => self.dock_beside(node, anchor, position, divider)?,
        }

        if let NodeKind::Leaf(leaf) = &mut self.existing_node_mut(node)?.kind {
            leaf.station = Some(station);
        }
        if let Some(nested) = self.sub_station_of(node) {
            self.existing_station_mut(nested)?.parent = Some(station);
        }
        Ok(())
    }

    fn dock_beside(
        &mut self,
        node: NodeId,
        anchor: NodeId,
        position: DockPosition,
        divider: Option<f64>,
    ) -> Result<()> {
        let Some(orientation) = position.orientation() else {
            return self.dock_as_tab(node, anchor);
        };
        // Side docks next to a tab split the whole tab group
        let anchor = self.enclosing_tabber(anchor)?.unwrap_or(anchor);

        let children = if position.leaf_first() {
            [Some(node), Some(anchor)]
        } else {
            [Some(anchor), Some(node)]
        };
        let owner = self.existing_node(anchor)?.owner;
        let splitter = self.insert_node(NodeKind::Splitter(SplitterContainer {
            orientation,
            divider: divider.unwrap_or(0.5).clamp(0.0, 1.0),
            children,
        }));
        self.replace_in_owner(anchor, owner, splitter)?;
        self.set_owner(node, Some(Owner::Container(splitter)))?;
        self.set_owner(anchor, Some(Owner::Container(splitter)))
    }

    /// A sub-station may not land in its own station or one nested below it
    fn check_nesting(&self, node: NodeId, target: DockTarget) -> Result<()> {
        let Some(nested) = self.sub_station_of(node) else {
            return Ok(());
        };
        let mut current = match target {
            DockTarget::Station(station) => Some(station),
            DockTarget::Node(anchor) => self.station_of(anchor),
        };
        while let Some(station) = current {
            if station == nested {
                return Err(LayoutError::InvalidDock {
                    node,
                    reason: "sub-station cannot dock inside itself",
                });
            }
            current = self.stations.get(&station).and_then(|s| s.parent);
        }
        Ok(())
    }

    /// Tab groups hold leaves only
    fn check_tab_dock(&self, node: NodeId, target: DockTarget) -> Result<()> {
        let anchor = match target {
            DockTarget::Station(station) => self.root(station).filter(|root| *root != node),
            DockTarget::Node(anchor) => Some(anchor),
        };
        // Docking into an empty station just sets its root
        let Some(anchor) = anchor else {
            return Ok(());
        };
        if !self.existing_node(node)?.is_leaf() {
            return Err(LayoutError::InvalidDock {
                node,
                reason: "only leaves can be docked as tabs",
            });
        }
        if self.enclosing_tabber(anchor)?.is_none() && !self.existing_node(anchor)?.is_leaf() {
            return Err(LayoutError::InvalidDock {
                node: anchor,
                reason: "tab target must be a leaf or a tab group",
            });
        }
        Ok(())
    }

    /// The tab group `node` is, or is a tab of
    fn enclosing_tabber(&self, node: NodeId) -> Result<Option<NodeId>> {
        let entry = self.existing_node(node)?;
        if matches!(entry.kind, NodeKind::Tabber(_)) {
            return Ok(Some(node));
        }
        match entry.owner {
            Some(Owner::Container(parent))
                if matches!(self.existing_node(parent)?.kind, NodeKind::Tabber(_)) =>
            {
                Ok(Some(parent))
            }
            _ => Ok(None),
        }
    }

    fn dock_as_tab(&mut self, node: NodeId, anchor: NodeId) -> Result<()> {
        // Docking onto a tab group or onto one of its tabs joins that group
        let tabber = match self.enclosing_tabber(anchor)? {
            Some(tabber) => tabber,
            None => {
                let owner = self.existing_node(anchor)?.owner;
                let tabber = self.insert_node(NodeKind::Tabber(TabberContainer {
                    tabs: vec![anchor],
                    selected: 0,
                }));
                self.replace_in_owner(anchor, owner, tabber)?;
                self.set_owner(anchor, Some(Owner::Container(tabber)))?;
                tabber
            }
        };

        if let NodeKind::Tabber(container) = &mut self.existing_node_mut(tabber)?.kind {
            container.add_tab(node);
        }
        self.set_owner(node, Some(Owner::Container(tabber)))
    }

    /// Wrap a docked node in a semantic-free layout wrapper
    pub fn wrap_in_passthrough(&mut self, node: NodeId) -> Result<NodeId> {
        let owner = self.existing_node(node)?.owner;
        let wrapper = self.insert_node(NodeKind::Passthrough(vec![node]));
        self.replace_in_owner(node, owner, wrapper)?;
        self.set_owner(node, Some(Owner::Container(wrapper)))?;
        Ok(wrapper)
    }

    /// Put `new` where `old` sits in `owner`
    fn replace_in_owner(&mut self, old: NodeId, owner: Option<Owner>, new: NodeId) -> Result<()> {
        match owner {
            None => Ok(()),
            Some(Owner::Station(station)) => {
                self.set_root(station, Some(new))?;
                self.set_owner(new, Some(Owner::Station(station)))
            }
            Some(Owner::Container(parent)) => {
                match &mut self.existing_node_mut(parent)?.kind {
                    NodeKind::Splitter(split) => {
                        for slot in split.children.iter_mut() {
                            if *slot == Some(old) {
                                *slot = Some(new);
                            }
                        }
                    }
                    NodeKind::Tabber(tabber) => {
                        for tab in tabber.tabs.iter_mut() {
                            if *tab == old {
                                *tab = new;
                            }
                        }
                    }
                    NodeKind::Passthrough(children) => {
                        for child in children.iter_mut() {
                            if *child == old {
                                *child = new;
                            }
                        }
                    }
                    NodeKind::SubStation(_) | NodeKind::Leaf(_) => {}
                }
                self.set_owner(new, Some(Owner::Container(parent)))
            }
        }
    }

    /// Detach a docked or floating leaf (or sub-station node) from the tree
    ///
    /// Tab groups left empty are removed; splitters left with a single child
    /// collapse into that child.
    pub fn undock(&mut self, node: NodeId) -> Result<()> {
        for station in self.stations.values_mut() {
            station.floating.retain(|f| f.leaf != node);
        }

        let owner = self.existing_node_mut(node)?.owner.take();
        if let NodeKind::Leaf(leaf) = &mut self.existing_node_mut(node)?.kind {
            leaf.station = None;
        }
        match owner {
            None => Ok(()),
            Some(Owner::Station(station)) => self.set_root(station, None),
            Some(Owner::Container(parent)) => self.remove_child(parent, node),
        }
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        enum Outcome {
            Keep,
            Remove,
            Collapse(NodeId),
        }

        let outcome = match &mut self.existing_node_mut(parent)?.kind {
            NodeKind::Splitter(split) => {
                for slot in split.children.iter_mut() {
                    if *slot == Some(child) {
                        *slot = None;
                    }
                }
                match split.children {
                    [Some(sibling), None] | [None, Some(sibling)] => Outcome::Collapse(sibling),
                    [None, None] => Outcome::Remove,
                    _ => Outcome::Keep,
                }
            }
            NodeKind::Tabber(tabber) => {
                tabber.remove_tab(child);
                if tabber.tabs.is_empty() {
                    Outcome::Remove
                } else {
                    Outcome::Keep
                }
            }
            NodeKind::Passthrough(children) => {
                children.retain(|c| *c != child);
                if children.is_empty() {
                    Outcome::Remove
                } else {
                    Outcome::Keep
                }
            }
            NodeKind::SubStation(_) | NodeKind::Leaf(_) => Outcome::Keep,
        };

        match outcome {
            Outcome::Keep => Ok(()),
            Outcome::Remove => {
                self.undock(parent)?;
                self.nodes.remove(&parent);
                Ok(())
            }
            Outcome::Collapse(sibling) => {
                let owner = self.existing_node(parent)?.owner;
                self.set_owner(sibling, None)?;
                self.replace_in_owner(parent, owner, sibling)?;
                self.nodes.remove(&parent);
                Ok(())
            }
        }
    }

    /// Float a leaf on `station` at absolute geometry, undocking it first
    pub fn float_leaf(&mut self, station: StationId, leaf: NodeId, geometry: Geometry) -> Result<()> {
        if !self.existing_node(leaf)?.is_leaf() {
            return Err(LayoutError::DanglingNode(leaf));
        }
        self.undock(leaf)?;
        self.existing_station_mut(station)?
            .floating
            .push(FloatingLeaf { leaf, geometry });
        self.attach_leaf(station, leaf)
    }

    /// Detach every leaf under `station` and drop everything else
    ///
    /// Returns the leaves in pre-order (docked first, then floating), nested
    /// sub-stations included. Containers, sub-station nodes and nested
    /// stations are discarded; leaf identities survive.
    pub fn undock_all(&mut self, station: StationId) -> Result<Vec<NodeId>> {
        let entry = self
            .stations
            .get(&station)
            .ok_or(LayoutError::UnknownStation(station))?;
        let root = entry.root;
        let floating: Vec<NodeId> = entry.floating.iter().map(|f| f.leaf).collect();

        let mut leaves = Vec::new();
        let mut discarded = Vec::new();
        let mut nested = Vec::new();
        if let Some(root) = root {
            self.collect_for_teardown(root, &mut leaves, &mut discarded, &mut nested);
        }
        leaves.extend(floating);

        for node in discarded {
            self.nodes.remove(&node);
        }
        for id in nested {
            self.stations.remove(&id);
        }
        for &leaf in &leaves {
            if let Some(entry) = self.nodes.get_mut(&leaf) {
                entry.owner = None;
                if let NodeKind::Leaf(l) = &mut entry.kind {
                    l.station = None;
                }
            }
        }

        let entry = self.existing_station_mut(station)?;
        entry.root = None;
        entry.floating.clear();
        Ok(leaves)
    }

    fn collect_for_teardown(
        &self,
        node: NodeId,
        leaves: &mut Vec<NodeId>,
        discarded: &mut Vec<NodeId>,
        nested: &mut Vec<StationId>,
    ) {
        let Some(entry) = self.nodes.get(&node) else {
            return;
        };
        match &entry.kind {
            NodeKind::Leaf(_) => leaves.push(node),
            NodeKind::SubStation(sub) => {
                discarded.push(node);
                nested.push(sub.station);
                if let Some(station) = self.stations.get(&sub.station) {
                    if let Some(root) = station.root {
                        self.collect_for_teardown(root, leaves, discarded, nested);
                    }
                    leaves.extend(station.floating.iter().map(|f| f.leaf));
                }
            }
            _ => {
                discarded.push(node);
                for child in entry.children() {
                    self.collect_for_teardown(child, leaves, discarded, nested);
                }
            }
        }
    }

    // =========================================================================
    // Ownership links
    // =========================================================================

    /// Recompute owner back-references for the whole tree of a station
    pub fn link_station(&mut self, station: StationId) -> Result<()> {
        if let Some(root) = self.root(station) {
            self.link_node(root, Owner::Station(station))?;
        }
        Ok(())
    }

    fn link_node(&mut self, node: NodeId, owner: Owner) -> Result<()> {
        self.set_owner(node, Some(owner))?;
        if let Some(nested) = self.sub_station_of(node) {
            return self.link_station(nested);
        }
        for child in self.existing_node(node)?.children() {
            self.link_node(child, Owner::Container(node))?;
        }
        Ok(())
    }
}

// ============================================================================
// Debug Invariant Validation
// ============================================================================

impl DockTree {
    /// Validate internal invariants in debug builds.
    ///
    /// This function checks that:
    /// - station roots exist and point back at their station
    /// - every container child exists and points back at its container
    /// - tab groups are non-empty with a valid selection
    /// - floating leaves exist and are leaves
    ///
    /// Panics in debug builds if any invariant is violated.
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        for (station_id, station) in &self.stations {
            if let Some(root) = station.root {
                let node = self
                    .nodes
                    .get(&root)
                    .unwrap_or_else(|| panic!("Station {:?} has dangling root {:?}", station_id, root));
                assert_eq!(
                    node.owner,
                    Some(Owner::Station(*station_id)),
                    "Root {:?} of station {:?} has wrong owner",
                    root,
                    station_id
                );
            }
            for floating in &station.floating {
                assert!(
                    self.nodes.get(&floating.leaf).is_some_and(|n| n.is_leaf()),
                    "Station {:?} floats non-leaf {:?}",
                    station_id,
                    floating.leaf
                );
            }
        }

        for (node_id, node) in &self.nodes {
            if let NodeKind::Tabber(tabber) = &node.kind {
                assert!(!tabber.tabs.is_empty(), "Tabber {:?} has no tabs", node_id);
                assert!(
                    tabber.selected < tabber.tabs.len(),
                    "Tabber {:?} selects {} of {} tabs",
                    node_id,
                    tabber.selected,
                    tabber.tabs.len()
                );
            }
            if let NodeKind::SubStation(sub) = &node.kind {
                assert!(
                    self.stations.contains_key(&sub.station),
                    "Sub-station {:?} references missing station {:?}",
                    node_id,
                    sub.station
                );
            }
            for child in node.children() {
                let entry = self
                    .nodes
                    .get(&child)
                    .unwrap_or_else(|| panic!("Node {:?} has dangling child {:?}", node_id, child));
                assert_eq!(
                    entry.owner,
                    Some(Owner::Container(*node_id)),
                    "Child {:?} of {:?} has wrong owner",
                    child,
                    node_id
                );
            }
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}
