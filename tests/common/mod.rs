//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use dockyard::layout::{serialize, LayoutDocument, SaveOptions};
use dockyard::model::{DockTarget, DockTree, NodeId, StationId};
use dockyard::panel::{DockPosition, Panel};

/// A tree with one top-level station
pub struct Fixture {
    pub tree: DockTree,
    pub station: StationId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut tree = DockTree::new();
        let station = tree.create_station();
        Self { tree, station }
    }

    /// Leaf by title; panics when absent
    pub fn leaf(&self, name: &str) -> NodeId {
        self.tree
            .find_leaf(name)
            .unwrap_or_else(|| panic!("no leaf named {:?}", name))
    }

    /// Add a leaf and dock it as the station root
    pub fn root_leaf(&mut self, name: &str) -> NodeId {
        let leaf = self.tree.add_leaf(Panel::titled(name));
        self.tree
            .dock(leaf, DockTarget::Station(self.station), DockPosition::Center, None)
            .unwrap();
        leaf
    }

    /// Add a leaf and dock it next to `anchor`
    pub fn dock_by(
        &mut self,
        name: &str,
        anchor: NodeId,
        position: DockPosition,
        divider: Option<f64>,
    ) -> NodeId {
        let leaf = self.tree.add_leaf(Panel::titled(name));
        self.tree
            .dock(leaf, DockTarget::Node(anchor), position, divider)
            .unwrap();
        leaf
    }

    pub fn document(&self) -> LayoutDocument {
        serialize(&self.tree, self.station, &SaveOptions::default()).unwrap()
    }

    pub fn xml(&self) -> String {
        self.document().to_xml(4).unwrap()
    }
}

/// `A` above `B`, divider at 0.35
pub fn two_pane() -> Fixture {
    let mut fixture = Fixture::new();
    let a = fixture.root_leaf("A");
    fixture.dock_by("B", a, DockPosition::Bottom, Some(0.35));
    fixture
}

/// One tab group holding `names` in order
pub fn tab_group(names: &[&str]) -> Fixture {
    let mut fixture = Fixture::new();
    let first = fixture.root_leaf(names[0]);
    for name in &names[1..] {
        fixture.dock_by(name, first, DockPosition::Center, None);
    }
    fixture
}

/// `Main` beside a sub-station `Outer`, which holds `Left` beside a nested
/// sub-station `Inner` holding `Deep`
pub fn nested_sub_stations() -> Fixture {
    let mut fixture = Fixture::new();
    let main = fixture.root_leaf("Main");

    let (outer, outer_station) = fixture
        .tree
        .create_sub_station(fixture.station, "Outer")
        .unwrap();
    let left = fixture.tree.add_leaf(Panel::titled("Left"));
    fixture
        .tree
        .dock(left, DockTarget::Station(outer_station), DockPosition::Center, None)
        .unwrap();

    let (inner, inner_station) = fixture
        .tree
        .create_sub_station(outer_station, "Inner")
        .unwrap();
    let deep = fixture.tree.add_leaf(Panel::titled("Deep"));
    fixture
        .tree
        .dock(deep, DockTarget::Station(inner_station), DockPosition::Center, None)
        .unwrap();

    fixture
        .tree
        .dock(inner, DockTarget::Node(left), DockPosition::Right, Some(0.6))
        .unwrap();
    fixture
        .tree
        .dock(outer, DockTarget::Node(main), DockPosition::Right, Some(0.3))
        .unwrap();
    fixture
}
