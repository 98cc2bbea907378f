//! Save/restore behavior of the layout engine

mod common;

use common::{nested_sub_stations, tab_group, two_pane, Fixture};
use dockyard::layout::{
    restore, restore_layout, save_layout, serialize, try_restore_layout, try_save_layout,
    LayoutDocument, SaveOptions,
};
use dockyard::model::{NodeKind, Owner};
use dockyard::panel::{DockPosition, Geometry, Orientation, Panel};
use dockyard::LayoutError;

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_round_trip_splitter_shape() {
    let mut fixture = two_pane();
    let a = fixture.leaf("A");
    let b = fixture.leaf("B");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.xml");

    assert!(save_layout(&fixture.tree, fixture.station, &path, &SaveOptions::default()));
    assert!(restore_layout(&mut fixture.tree, fixture.station, &path));

    let root = fixture.tree.root(fixture.station).unwrap();
    let NodeKind::Splitter(split) = &fixture.tree.node(root).unwrap().kind else {
        panic!("expected splitter at root");
    };
    assert_eq!(split.orientation, Orientation::Vertical);
    assert!((split.divider - 0.35).abs() < 1e-9);
    // Same leaf instances in the same slots
    assert_eq!(split.first(), Some(a));
    assert_eq!(split.second(), Some(b));
    fixture.tree.assert_invariants();
}

#[test]
fn test_tab_order_survives_round_trip() {
    let mut fixture = tab_group(&["A", "B", "C"]);
    let document = fixture.document();

    restore(&document, &mut fixture.tree, fixture.station).unwrap();

    let root = fixture.tree.root(fixture.station).unwrap();
    let NodeKind::Tabber(tabber) = &fixture.tree.node(root).unwrap().kind else {
        panic!("expected tab group at root");
    };
    let titles: Vec<_> = tabber
        .tabs
        .iter()
        .map(|t| fixture.tree.title(*t).unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert_eq!(tabber.selected_tab(), Some(fixture.leaf("A")));
}

#[test]
fn test_serialization_is_idempotent() {
    let fixture = nested_sub_stations();
    assert_eq!(fixture.xml(), fixture.xml());
}

#[test]
fn test_restore_then_save_reproduces_document() {
    let mut fixture = two_pane();
    let a = fixture.leaf("A");
    fixture.dock_by("C", a, DockPosition::Center, None);
    fixture.dock_by("D", a, DockPosition::Left, Some(0.2));
    let before = fixture.xml();

    let document = LayoutDocument::parse(&before).unwrap();
    restore(&document, &mut fixture.tree, fixture.station).unwrap();

    assert_eq!(fixture.xml(), before);
    fixture.tree.assert_invariants();
}

#[test]
fn test_written_file_format() {
    let fixture = two_pane();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.xml");
    try_save_layout(&fixture.tree, fixture.station, &path, &SaveOptions::default()).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<DockStation>
    <DockSplitterContainer dividerPositions="0.35" orientation="VERTICAL">
        <DockNode name="A"/>
        <DockNode name="B"/>
    </DockSplitterContainer>
</DockStation>
"#
    );
}

// ============================================================================
// Missing leaves
// ============================================================================

#[test]
fn test_missing_leaf_keeps_siblings() {
    let mut fixture = Fixture::new();
    let a = fixture.root_leaf("A");
    fixture.dock_by("B", a, DockPosition::Right, None);

    let document = LayoutDocument::parse(
        r#"<DockStation>
            <DockSplitterContainer dividerPositions="0.5" orientation="HORIZONTAL">
                <DockTabberContainer>
                    <DockNode name="A"/>
                    <DockNode name="X"/>
                </DockTabberContainer>
                <DockNode name="B"/>
            </DockSplitterContainer>
        </DockStation>"#,
    )
    .unwrap();

    let restored = restore(&document, &mut fixture.tree, fixture.station).unwrap();
    assert!(restored.unplaced.is_empty());
    assert_eq!(
        fixture.tree.docked_leaves(fixture.station),
        vec![fixture.leaf("A"), fixture.leaf("B")]
    );
}

#[test]
fn test_unplaced_leaves_are_reported() {
    let mut fixture = two_pane();
    let document = LayoutDocument::parse(r#"<DockStation><DockNode name="B"/></DockStation>"#).unwrap();

    let restored = restore(&document, &mut fixture.tree, fixture.station).unwrap();
    assert_eq!(restored.root, Some(fixture.leaf("B")));
    assert_eq!(restored.unplaced, vec![fixture.leaf("A")]);
    assert_eq!(fixture.tree.owner(fixture.leaf("A")), None);
}

// ============================================================================
// Sub-stations
// ============================================================================

#[test]
fn test_sub_station_element_holds_single_child() {
    let mut fixture = Fixture::new();
    let main = fixture.root_leaf("Main");
    let (sub, nested) = fixture
        .tree
        .create_sub_station(fixture.station, "SubA")
        .unwrap();
    let inner = fixture.tree.add_leaf(Panel::titled("Inner"));
    fixture
        .tree
        .dock(inner, dockyard::model::DockTarget::Station(nested), DockPosition::Center, None)
        .unwrap();
    fixture
        .tree
        .dock(sub, dockyard::model::DockTarget::Node(main), DockPosition::Bottom, None)
        .unwrap();

    let document = fixture.document();
    let split = document.structural_root().unwrap();
    let sub_element = &split.children[1];
    assert_eq!(sub_element.name, "DockSubStation");
    assert_eq!(sub_element.attr("name"), Some("SubA"));
    assert_eq!(sub_element.children.len(), 1);
    assert_eq!(sub_element.children[0].attr("name"), Some("Inner"));

    restore(&document, &mut fixture.tree, fixture.station).unwrap();
    let root = fixture.tree.root(fixture.station).unwrap();
    let NodeKind::Splitter(split) = &fixture.tree.node(root).unwrap().kind else {
        panic!("expected splitter at root");
    };
    let restored_sub = split.second().unwrap();
    let restored_nested = fixture.tree.sub_station_of(restored_sub).unwrap();
    assert_eq!(fixture.tree.root(restored_nested), Some(inner));
    assert_eq!(fixture.tree.owner(inner), Some(Owner::Station(restored_nested)));
}

#[test]
fn test_multi_level_sub_stations_round_trip() {
    let mut fixture = nested_sub_stations();
    let before = fixture.xml();
    let stations_before = fixture.tree.station_count();

    let document = LayoutDocument::parse(&before).unwrap();
    restore(&document, &mut fixture.tree, fixture.station).unwrap();

    assert_eq!(fixture.xml(), before);
    // Old nested stations are discarded, new ones created
    assert_eq!(fixture.tree.station_count(), stations_before);

    let deep = fixture.leaf("Deep");
    let inner_station = fixture.tree.station_of(deep).unwrap();
    let inner = fixture.tree.station(inner_station).unwrap();
    let outer = fixture.tree.station(inner.parent.unwrap()).unwrap();
    assert_eq!(outer.parent, Some(fixture.station));
    fixture.tree.assert_invariants();
}

// ============================================================================
// Floating leaves
// ============================================================================

#[test]
fn test_floating_round_trip() {
    let mut fixture = two_pane();
    let floater = fixture.tree.add_leaf(Panel::titled("Floater1"));
    let geometry = Geometry::new(120.0, 40.0, 300.0, 200.0);
    fixture
        .tree
        .float_leaf(fixture.station, floater, geometry)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.xml");
    try_save_layout(&fixture.tree, fixture.station, &path, &SaveOptions::default()).unwrap();
    assert!(std::fs::read_to_string(&path)
        .unwrap()
        .contains(r#"<DockNode name="Floater1" position-x="120.0" position-y="40.0" width="300.0" height="200.0"/>"#));

    try_restore_layout(&mut fixture.tree, fixture.station, &path).unwrap();
    assert_eq!(fixture.tree.floating_geometry(floater), Some(geometry));
    assert_eq!(fixture.tree.station_of(floater), Some(fixture.station));
    fixture.tree.assert_invariants();
}

#[test]
fn test_sub_station_floating_leaves_move_to_target() {
    let mut fixture = nested_sub_stations();
    let deep = fixture.leaf("Deep");
    let inner_station = fixture.tree.station_of(deep).unwrap();
    let floater = fixture.tree.add_leaf(Panel::titled("Palette"));
    fixture
        .tree
        .float_leaf(inner_station, floater, Geometry::new(5.0, 5.0, 50.0, 50.0))
        .unwrap();

    let document = fixture.document();
    assert_eq!(document.floating().unwrap().children.len(), 1);

    restore(&document, &mut fixture.tree, fixture.station).unwrap();
    assert_eq!(fixture.tree.station_of(floater), Some(fixture.station));
    assert!(fixture.tree.floating_geometry(floater).is_some());
}

// ============================================================================
// Passthrough wrappers
// ============================================================================

#[test]
fn test_passthrough_wrappers_are_not_restored() {
    let mut fixture = two_pane();
    let plain = fixture.xml();

    let a = fixture.leaf("A");
    fixture.tree.wrap_in_passthrough(a).unwrap();
    let root = fixture.tree.root(fixture.station).unwrap();
    fixture.tree.wrap_in_passthrough(root).unwrap();
    assert_eq!(fixture.xml(), plain);

    let document = fixture.document();
    restore(&document, &mut fixture.tree, fixture.station).unwrap();
    let root = fixture.tree.root(fixture.station).unwrap();
    assert!(matches!(
        fixture.tree.node(root).unwrap().kind,
        NodeKind::Splitter(_)
    ));
    assert_eq!(fixture.tree.owner(a).map(|o| matches!(o, Owner::Container(_))), Some(true));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_empty_station_writes_nothing() {
    let fixture = Fixture::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.xml");

    assert!(!save_layout(&fixture.tree, fixture.station, &path, &SaveOptions::default()));
    assert!(!path.exists());
    assert!(matches!(
        serialize(&fixture.tree, fixture.station, &SaveOptions::default()),
        Err(LayoutError::EmptyTree)
    ));
}

#[test]
fn test_unparseable_file_leaves_tree_untouched() {
    let mut fixture = two_pane();
    let before = fixture.tree.docked_leaves(fixture.station);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    std::fs::write(&path, "<DockStation><DockNode name=\"A\">").unwrap();

    assert!(!restore_layout(&mut fixture.tree, fixture.station, &path));
    assert_eq!(fixture.tree.docked_leaves(fixture.station), before);
}

#[test]
fn test_missing_file_fails() {
    let mut fixture = two_pane();
    let dir = tempfile::tempdir().unwrap();
    let result = try_restore_layout(&mut fixture.tree, fixture.station, &dir.path().join("none.xml"));
    assert!(matches!(result, Err(LayoutError::Io(_))));
}

#[test]
fn test_malformed_document_aborts_without_rollback() {
    let mut fixture = two_pane();
    let document = LayoutDocument::parse(
        r#"<DockStation>
            <DockSplitterContainer dividerPositions="0.5" orientation="HORIZONTAL">
                <DockNode name="A"/>
            </DockSplitterContainer>
        </DockStation>"#,
    )
    .unwrap();

    let result = restore(&document, &mut fixture.tree, fixture.station);
    assert!(matches!(result, Err(LayoutError::Malformed { .. })));
    assert!(fixture.tree.station(fixture.station).unwrap().is_empty());
    assert_eq!(fixture.tree.owner(fixture.leaf("A")), None);
    assert_eq!(fixture.tree.station_of(fixture.leaf("A")), None);
    assert_eq!(fixture.tree.node_count(), 2);
    fixture.tree.assert_invariants();
}

#[test]
fn test_deep_malformed_element_builds_nothing() {
    let mut fixture = tab_group(&["A", "B"]);
    let a = fixture.leaf("A");
    fixture.dock_by("Z", a, DockPosition::Right, None);
    let document = LayoutDocument::parse(
        r#"<DockStation>
            <DockSplitterContainer dividerPositions="0.5" orientation="HORIZONTAL">
                <DockTabberContainer><DockNode name="A"/><DockNode name="B"/></DockTabberContainer>
                <DockSplitterContainer dividerPositions="0.5" orientation="VERTICAL">
                    <DockNode name="Z"/>
                </DockSplitterContainer>
            </DockSplitterContainer>
        </DockStation>"#,
    )
    .unwrap();

    let result = restore(&document, &mut fixture.tree, fixture.station);
    assert!(matches!(result, Err(LayoutError::Malformed { .. })));
    fixture.tree.assert_invariants();
    assert_eq!(fixture.tree.node_count(), 3);
    for name in ["A", "B", "Z"] {
        let leaf = fixture.leaf(name);
        assert_eq!(fixture.tree.owner(leaf), None);
        assert_eq!(fixture.tree.station_of(leaf), None);
    }

    // The same leaves restore cleanly from a well-formed document afterwards
    let fixed = LayoutDocument::parse(
        r#"<DockStation>
            <DockSplitterContainer dividerPositions="0.5" orientation="HORIZONTAL">
                <DockTabberContainer><DockNode name="A"/><DockNode name="B"/></DockTabberContainer>
                <DockNode name="Z"/>
            </DockSplitterContainer>
        </DockStation>"#,
    )
    .unwrap();
    let restored = restore(&fixed, &mut fixture.tree, fixture.station).unwrap();
    assert!(restored.unplaced.is_empty());
    fixture.tree.assert_invariants();
}

#[test]
fn test_malformed_floating_entry_builds_nothing() {
    let mut fixture = two_pane();
    let document = LayoutDocument::parse(
        r#"<DockStation>
            <DockSplitterContainer dividerPositions="0.5" orientation="HORIZONTAL">
                <DockNode name="A"/><DockNode name="B"/>
            </DockSplitterContainer>
            <floating><DockNode name="C" position-x="1.0"/></floating>
        </DockStation>"#,
    )
    .unwrap();

    let result = restore(&document, &mut fixture.tree, fixture.station);
    assert!(matches!(result, Err(LayoutError::Malformed { .. })));
    assert!(fixture.tree.station(fixture.station).unwrap().is_empty());
    assert_eq!(fixture.tree.node_count(), 2);
    fixture.tree.assert_invariants();
}

#[test]
fn test_document_without_structure_is_empty() {
    let mut fixture = two_pane();
    let document = LayoutDocument::parse(
        r#"<DockStation><floating/></DockStation>"#,
    )
    .unwrap();
    assert!(matches!(
        restore(&document, &mut fixture.tree, fixture.station),
        Err(LayoutError::EmptyDocument)
    ));
}
