//! Tree Serializer - live dock tree to layout document
//!
//! Depth-first pre-order walk. Every semantic node becomes exactly one
//! element; passthrough wrappers contribute their children to the nearest
//! semantic ancestor instead of an element of their own.

use serde::{Deserialize, Serialize};

use super::document::{attr, Element, ElementKind, LayoutDocument, FLOATING_TAG, ROOT_ELEMENT};
use super::host::{DockHost, NodeClass};
use crate::error::{LayoutError, Result};
use crate::model::{FloatingLeaf, NodeId, StationId};

/// Output options for `serialize` and `save_layout`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Spaces per nesting level in the written file
    pub indent: usize,
    /// Emit the walk depth as an `index` attribute on leaves
    pub emit_index: bool,
    /// Tag of the document root
    pub root_element: String,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            emit_index: false,
            root_element: ROOT_ELEMENT.to_string(),
        }
    }
}

/// Capture the tree of `station` as a document
///
/// Fails with `EmptyTree` when the station has nothing docked, including a
/// root made only of empty splitters. Floating
/// leaves of the station and of every nested sub-station are listed in a
/// trailing `floating` section.
pub fn serialize<H: DockHost + ?Sized>(
    host: &H,
    station: StationId,
    options: &SaveOptions,
) -> Result<LayoutDocument> {
    let root = host.station_root(station)?.ok_or(LayoutError::EmptyTree)?;

    let mut walker = Walker {
        host,
        options,
        floating: host.floating_leaves(station)?,
    };
    let mut document = LayoutDocument::new(options.root_element.as_str());
    walker.walk(root, &mut document.root, 0)?;
    if document.structural_root().is_none() {
        return Err(LayoutError::EmptyTree);
    }

    if !walker.floating.is_empty() {
        let mut section = Element::new(FLOATING_TAG);
        for entry in &walker.floating {
            section.children.push(floating_element(host, entry)?);
        }
        document.root.children.push(section);
    }

    tracing::debug!(
        station = station.0,
        elements = document.root.children.len(),
        floating = walker.floating.len(),
        "Serialized station"
    );
    Ok(document)
}

struct Walker<'a, H: ?Sized> {
    host: &'a H,
    options: &'a SaveOptions,
    floating: Vec<FloatingLeaf>,
}

impl<H: DockHost + ?Sized> Walker<'_, H> {
    fn walk(&mut self, node: NodeId, parent: &mut Element, depth: usize) -> Result<()> {
        let host = self.host;
        match host.classify(node)? {
            NodeClass::Splitter {
                orientation,
                dividers,
                first,
                second,
            } => {
                let mut element = Element::of_kind(ElementKind::Splitter)
                    .with_attr(attr::DIVIDER_POSITIONS, join_fractions(dividers))
                    .with_attr(attr::ORIENTATION, orientation.as_str());
                for child in [first, second].into_iter().flatten() {
                    self.walk(child, &mut element, depth + 1)?;
                }
                // Only a split with content on both sides is written as one;
                // otherwise whatever the slots produced moves up a level
                if element.children.len() == 2 {
                    parent.children.push(element);
                } else {
                    parent.children.append(&mut element.children);
                }
            }

            NodeClass::Tabber { tabs } => {
                let mut element = Element::of_kind(ElementKind::Tabber);
                for &tab in tabs {
                    self.walk(tab, &mut element, depth + 1)?;
                }
                parent.children.push(element);
            }

            NodeClass::SubStation { name, station } => {
                let mut element = Element::of_kind(ElementKind::SubStation).with_attr(attr::NAME, name);
                if let Some(root) = host.station_root(station)? {
                    self.walk(root, &mut element, depth + 1)?;
                }
                self.floating.extend(host.floating_leaves(station)?);
                parent.children.push(element);
            }

            NodeClass::Leaf { name } => {
                let mut element = Element::of_kind(ElementKind::Leaf).with_attr(attr::NAME, name);
                if self.options.emit_index {
                    element.set_attr(attr::INDEX, depth.to_string());
                }
                parent.children.push(element);
            }

            NodeClass::Passthrough { children } => {
                for &child in children {
                    self.walk(child, parent, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

fn floating_element<H: DockHost + ?Sized>(host: &H, entry: &FloatingLeaf) -> Result<Element> {
    let name = host
        .leaf_name(entry.leaf)
        .ok_or(LayoutError::DanglingNode(entry.leaf))?;
    let geometry = entry.geometry;
    Ok(Element::of_kind(ElementKind::Leaf)
        .with_attr(attr::NAME, name)
        .with_attr(attr::POSITION_X, format_fraction(geometry.x))
        .with_attr(attr::POSITION_Y, format_fraction(geometry.y))
        .with_attr(attr::WIDTH, format_fraction(geometry.width))
        .with_attr(attr::HEIGHT, format_fraction(geometry.height)))
}

/// Shortest round-trip form, always with a fractional part (`120.0`, `0.35`)
pub fn format_fraction(value: f64) -> String {
    format!("{:?}", value)
}

fn join_fractions(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_fraction(*v))
        .collect::<Vec<_>>()
        .join(" ")
}
