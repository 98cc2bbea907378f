//! Tree Rebuilder - layout document back into a live dock tree
//!
//! The target station is torn down into a pool of leaves first; the document
//! is then interpreted bottom-up, each element resolving to a node or to
//! nothing. Leaves named in the document but missing from the pool are
//! skipped and their branch shrinks accordingly.

use super::document::{attr, Element, ElementKind, LayoutDocument};
use super::host::{DockHost, NodeClass};
use crate::error::{LayoutError, Result};
use crate::model::{NodeId, Owner, StationId};
use crate::panel::{Geometry, Orientation};

/// Outcome of a successful restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    /// New root of the target station, `None` when nothing resolved
    pub root: Option<NodeId>,
    /// Pooled leaves the document never placed; they stay undocked
    pub unplaced: Vec<NodeId>,
}

/// Leaves collected from the target station before rebuilding
///
/// A leaf is handed out at most once. With duplicate names the first leaf in
/// pool order wins.
#[derive(Debug, Default)]
struct PanelPool {
    entries: Vec<(NodeId, String)>,
}

impl PanelPool {
    fn collect<H: DockHost + ?Sized>(host: &mut H, station: StationId) -> Result<Self> {
        let leaves = host.undock_all(station)?;
        let entries = leaves
            .into_iter()
            .map(|leaf| {
                let name = host
                    .leaf_name(leaf)
                    .ok_or(LayoutError::DanglingNode(leaf))?
                    .to_string();
                Ok((leaf, name))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    fn take(&mut self, name: &str) -> Option<NodeId> {
        let index = self.entries.iter().position(|(_, n)| n == name)?;
        Some(self.entries.remove(index).0)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn into_leaves(self) -> Vec<NodeId> {
        self.entries.into_iter().map(|(leaf, _)| leaf).collect()
    }
}

/// Rebuild `target` from `document`
///
/// Every leaf under `target` is undocked before the document is inspected, so
/// on `EmptyDocument` or a malformed element the station is left empty with
/// its leaves undocked. The whole document is checked before the first node
/// is created; a malformed element never leaves partial containers behind.
pub fn restore<H: DockHost + ?Sized>(
    document: &LayoutDocument,
    host: &mut H,
    target: StationId,
) -> Result<Restored> {
    let pool = PanelPool::collect(host, target)?;
    tracing::debug!(station = target.0, pooled = pool.len(), "Collected panel pool");

    let start = document
        .structural_root()
        .ok_or(LayoutError::EmptyDocument)?;
    check_element(start)?;
    if let Some(floating) = document.floating() {
        check_floating(floating)?;
    }

    let mut rebuilder = Rebuilder { host, pool };
    let root = rebuilder.rebuild(start, target)?;

    rebuilder.host.set_station_root(target, root)?;
    if let Some(root) = root {
        link_parents(rebuilder.host, root, Owner::Station(target))?;
    }

    if let Some(floating) = document.floating() {
        rebuilder.restore_floating(floating, target)?;
    }

    let unplaced = rebuilder.pool.into_leaves();
    if !unplaced.is_empty() {
        tracing::debug!(count = unplaced.len(), "Leaves left undocked after restore");
    }
    Ok(Restored { root, unplaced })
}

struct Rebuilder<'a, H: ?Sized> {
    host: &'a mut H,
    pool: PanelPool,
}

impl<H: DockHost + ?Sized> Rebuilder<'_, H> {
    /// Resolve one element in the context of `station`
    fn rebuild(&mut self, element: &Element, station: StationId) -> Result<Option<NodeId>> {
        let kind = element
            .kind()
            .ok_or_else(|| LayoutError::malformed(&element.name, "unknown element"))?;

        match kind {
            ElementKind::Splitter => {
                let divider = parse_divider(element)?;
                let orientation = parse_orientation(element)?;
                let (first, second) = splitter_children(element)?;

                let first = self.rebuild(first, station)?;
                let second = self.rebuild(second, station)?;
                if first.is_none() && second.is_none() {
                    return Ok(None);
                }
                let split = self
                    .host
                    .create_splitter(first, second, orientation, divider)?;
                Ok(Some(split))
            }

            ElementKind::Tabber => {
                check_tabs(element)?;

                // Front-insert composition: hand tabs over last-to-first
                let mut tabs = Vec::with_capacity(element.children.len());
                for child in element.children.iter().rev() {
                    if let Some(tab) = self.rebuild(child, station)? {
                        tabs.push(tab);
                    }
                }
                if tabs.is_empty() {
                    return Ok(None);
                }
                Ok(Some(self.host.create_tabber(tabs)?))
            }

            ElementKind::SubStation => {
                let name = element.required_attr(attr::NAME)?;
                let child = sub_station_child(element)?;

                let (node, nested) = self.host.create_sub_station(station, name)?;
                if let Some(child) = child {
                    let nested_root = self.rebuild(child, nested)?;
                    self.host.set_station_root(nested, nested_root)?;
                }
                Ok(Some(node))
            }

            ElementKind::Leaf => {
                let name = element.required_attr(attr::NAME)?;
                match self.pool.take(name) {
                    Some(leaf) => {
                        self.host.attach_leaf(station, leaf)?;
                        Ok(Some(leaf))
                    }
                    None => {
                        tracing::debug!(name, "No pooled leaf for layout entry, skipping");
                        Ok(None)
                    }
                }
            }
        }
    }

    fn restore_floating(&mut self, floating: &Element, station: StationId) -> Result<()> {
        for entry in &floating.children {
            let (name, geometry) = floating_entry(entry)?;
            match self.pool.take(name) {
                Some(leaf) => self.host.float_leaf(station, leaf, geometry)?,
                None => tracing::debug!(name, "No pooled leaf for floating entry, skipping"),
            }
        }
        Ok(())
    }
}

/// Structural check of a document section, run before anything is built
fn check_element(element: &Element) -> Result<()> {
    let kind = element
        .kind()
        .ok_or_else(|| LayoutError::malformed(&element.name, "unknown element"))?;

    match kind {
        ElementKind::Splitter => {
            parse_divider(element)?;
            parse_orientation(element)?;
            let (first, second) = splitter_children(element)?;
            check_element(first)?;
            check_element(second)
        }
        ElementKind::Tabber => {
            check_tabs(element)?;
            element.children.iter().try_for_each(check_element)
        }
        ElementKind::SubStation => {
            element.required_attr(attr::NAME)?;
            sub_station_child(element)?.map_or(Ok(()), check_element)
        }
        ElementKind::Leaf => element.required_attr(attr::NAME).map(|_| ()),
    }
}

fn check_floating(floating: &Element) -> Result<()> {
    floating
        .children
        .iter()
        .try_for_each(|entry| floating_entry(entry).map(|_| ()))
}

fn splitter_children(element: &Element) -> Result<(&Element, &Element)> {
    match element.children.as_slice() {
        [first, second] => Ok((first, second)),
        children => Err(LayoutError::malformed(
            &element.name,
            format!("expected 2 children, found {}", children.len()),
        )),
    }
}

fn check_tabs(element: &Element) -> Result<()> {
    if element.children.is_empty() {
        return Err(LayoutError::malformed(&element.name, "tab group has no tabs"));
    }
    match element
        .children
        .iter()
        .find(|c| c.kind() != Some(ElementKind::Leaf))
    {
        Some(bad) => Err(LayoutError::malformed(
            &element.name,
            format!("tab group may only hold leaves, found <{}>", bad.name),
        )),
        None => Ok(()),
    }
}

fn sub_station_child(element: &Element) -> Result<Option<&Element>> {
    match element.children.as_slice() {
        [] => Ok(None),
        [child] => Ok(Some(child)),
        children => Err(LayoutError::malformed(
            &element.name,
            format!("expected at most 1 child, found {}", children.len()),
        )),
    }
}

fn floating_entry(entry: &Element) -> Result<(&str, Geometry)> {
    if entry.kind() != Some(ElementKind::Leaf) {
        return Err(LayoutError::malformed(
            &entry.name,
            "floating section may only hold leaves",
        ));
    }
    let name = entry.required_attr(attr::NAME)?;
    let geometry = Geometry::new(
        entry.f64_attr(attr::POSITION_X)?,
        entry.f64_attr(attr::POSITION_Y)?,
        entry.f64_attr(attr::WIDTH)?,
        entry.f64_attr(attr::HEIGHT)?,
    );
    Ok((name, geometry))
}

/// First value of `dividerPositions`; every listed value must be a fraction
fn parse_divider(element: &Element) -> Result<f64> {
    let raw = element.required_attr(attr::DIVIDER_POSITIONS)?;
    let mut values = Vec::new();
    for token in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let value = token
            .parse::<f64>()
            .ok()
            .filter(|v| (0.0..=1.0).contains(v))
            .ok_or_else(|| {
                LayoutError::malformed(
                    &element.name,
                    format!("divider position out of range or not a number: {:?}", token),
                )
            })?;
        values.push(value);
    }
    values
        .first()
        .copied()
        .ok_or_else(|| LayoutError::malformed(&element.name, "empty `dividerPositions`"))
}

fn parse_orientation(element: &Element) -> Result<Orientation> {
    let raw = element.required_attr(attr::ORIENTATION)?;
    Orientation::parse(raw).ok_or_else(|| {
        LayoutError::malformed(&element.name, format!("unknown orientation {:?}", raw))
    })
}

/// Point every node reachable from `node` at its owner, descending into
/// nested sub-station trees
fn link_parents<H: DockHost + ?Sized>(host: &mut H, node: NodeId, owner: Owner) -> Result<()> {
    enum Next {
        Children(Vec<NodeId>),
        Nested(StationId),
    }

    host.set_owner(node, owner)?;
    let next = match host.classify(node)? {
        NodeClass::Splitter { first, second, .. } => {
            Next::Children([first, second].into_iter().flatten().collect())
        }
        NodeClass::Tabber { tabs } => Next::Children(tabs.to_vec()),
        NodeClass::Passthrough { children } => Next::Children(children.to_vec()),
        NodeClass::SubStation { station, .. } => Next::Nested(station),
        NodeClass::Leaf { .. } => Next::Children(Vec::new()),
    };

    match next {
        Next::Children(children) => {
            for child in children {
                link_parents(host, child, Owner::Container(node))?;
            }
        }
        Next::Nested(station) => {
            if let Some(root) = host.station_root(station)? {
                link_parents(host, root, Owner::Station(station))?;
            }
        }
    }
    Ok(())
}
