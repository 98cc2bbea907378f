//! Layout dumps for diagnostics
//!
//! Two views: a JSON snapshot of a live station (what the tree holds right
//! now) and a plain-text outline of a layout document (what a file says).

use serde::Serialize;

use crate::error::{LayoutError, Result};
use crate::layout::document::{Element, LayoutDocument};
use crate::layout::{DockHost, NodeClass};
use crate::model::{NodeId, StationId};
use crate::panel::{Geometry, Orientation};

#[derive(Debug, Serialize)]
pub struct StationDump {
    pub id: u64,
    pub root: Option<NodeDump>,
    pub floating: Vec<FloatingDump>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDump {
    Splitter {
        orientation: Orientation,
        dividers: Vec<f64>,
        first: Option<Box<NodeDump>>,
        second: Option<Box<NodeDump>>,
    },
    Tabber {
        tabs: Vec<NodeDump>,
    },
    SubStation {
        name: String,
        station: Box<StationDump>,
    },
    Leaf {
        id: u64,
        name: String,
    },
    Passthrough {
        children: Vec<NodeDump>,
    },
}

#[derive(Debug, Serialize)]
pub struct FloatingDump {
    pub name: String,
    pub geometry: Geometry,
}

impl StationDump {
    pub fn collect<H: DockHost + ?Sized>(host: &H, station: StationId) -> Result<Self> {
        let root = match host.station_root(station)? {
            Some(root) => Some(NodeDump::collect(host, root)?),
            None => None,
        };
        let floating = host
            .floating_leaves(station)?
            .into_iter()
            .map(|entry| {
                let name = host
                    .leaf_name(entry.leaf)
                    .ok_or(LayoutError::DanglingNode(entry.leaf))?;
                Ok(FloatingDump {
                    name: name.to_string(),
                    geometry: entry.geometry,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: station.0,
            root,
            floating,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl NodeDump {
    fn collect<H: DockHost + ?Sized>(host: &H, node: NodeId) -> Result<Self> {
        let boxed = |child: Option<NodeId>| -> Result<Option<Box<NodeDump>>> {
            child
                .map(|c| NodeDump::collect(host, c).map(Box::new))
                .transpose()
        };

        Ok(match host.classify(node)? {
            NodeClass::Splitter {
                orientation,
                dividers,
                first,
                second,
            } => NodeDump::Splitter {
                orientation,
                dividers: dividers.to_vec(),
                first: boxed(first)?,
                second: boxed(second)?,
            },
            NodeClass::Tabber { tabs } => NodeDump::Tabber {
                tabs: collect_all(host, tabs)?,
            },
            NodeClass::SubStation { name, station } => NodeDump::SubStation {
                name: name.to_string(),
                station: Box::new(StationDump::collect(host, station)?),
            },
            NodeClass::Leaf { name } => NodeDump::Leaf {
                id: node.0,
                name: name.to_string(),
            },
            NodeClass::Passthrough { children } => NodeDump::Passthrough {
                children: collect_all(host, children)?,
            },
        })
    }
}

fn collect_all<H: DockHost + ?Sized>(host: &H, nodes: &[NodeId]) -> Result<Vec<NodeDump>> {
    nodes.iter().map(|&n| NodeDump::collect(host, n)).collect()
}

/// Indented one-line-per-element outline of a document
pub fn outline(document: &LayoutDocument) -> String {
    fn walk(element: &Element, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&element.name);
        for (key, value) in &element.attributes {
            out.push_str(&format!(" {}={:?}", key, value));
        }
        out.push('\n');
        for child in &element.children {
            walk(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    walk(&document.root, 0, &mut out);
    out
}
