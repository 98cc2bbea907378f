//! Error taxonomy for layout save/restore
//!
//! Unresolved leaves are deliberately absent: a document leaf with no match in
//! the panel pool resolves to `None` and its branch is elided.

use thiserror::Error;

use crate::model::{NodeId, StationId};

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// Save attempted on a station with no docked children
    #[error("station has no docked children")]
    EmptyTree,

    /// Restore input has no structural child under the root element
    #[error("layout document has no structural root element")]
    EmptyDocument,

    /// Missing attribute, bad value, wrong child cardinality or unknown tag
    #[error("malformed <{element}>: {reason}")]
    Malformed { element: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unknown station {0:?}")]
    UnknownStation(StationId),

    #[error("dangling node {0:?}")]
    DanglingNode(NodeId),

    /// Docking request that would break the tree shape
    #[error("cannot dock {node:?}: {reason}")]
    InvalidDock { node: NodeId, reason: &'static str },
}

impl LayoutError {
    pub fn malformed(element: impl Into<String>, reason: impl Into<String>) -> Self {
        LayoutError::Malformed {
            element: element.into(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for LayoutError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        LayoutError::Xml(error.into())
    }
}

impl From<quick_xml::escape::EscapeError> for LayoutError {
    fn from(error: quick_xml::escape::EscapeError) -> Self {
        LayoutError::Xml(error.into())
    }
}
