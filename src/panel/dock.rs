//! Docking directions, splitter orientation and leaf content
//!
//! This module defines the value types passed to the docking primitives.

use serde::{Deserialize, Serialize};

/// Where a leaf is docked relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DockPosition {
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl DockPosition {
    /// Returns the splitter orientation this position creates, `None` for tabs
    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            DockPosition::Center => None,
            DockPosition::Left | DockPosition::Right => Some(Orientation::Horizontal),
            DockPosition::Top | DockPosition::Bottom => Some(Orientation::Vertical),
        }
    }

    /// Whether the docked leaf takes the first (left/top) slot of the new split
    pub fn leaf_first(&self) -> bool {
        matches!(self, DockPosition::Left | DockPosition::Top)
    }

    /// All dock positions for iteration
    pub const ALL: [DockPosition; 5] = [
        DockPosition::Center,
        DockPosition::Left,
        DockPosition::Right,
        DockPosition::Top,
        DockPosition::Bottom,
    ];
}

/// Axis of a splitter
///
/// Horizontal places children left-to-right, vertical top-to-bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Wire form used in layout documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "HORIZONTAL",
            Orientation::Vertical => "VERTICAL",
        }
    }

    /// Parse the wire form (exact, upper case)
    pub fn parse(value: &str) -> Option<Orientation> {
        match value.trim() {
            "HORIZONTAL" => Some(Orientation::Horizontal),
            "VERTICAL" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

/// Absolute screen placement of a floating leaf
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Content-bearing leaf of the dock tree
///
/// The title is the only identity the layout engine uses. The content is an
/// opaque payload owned by the host (a widget key, a view name...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Caller-visible name, unique within one save/restore cycle
    pub title: String,

    /// Opaque host payload, never inspected by the engine
    #[serde(default)]
    pub content: String,
}

impl Panel {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Panel with empty content
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, String::new())
    }
}
