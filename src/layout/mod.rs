//! Layout persistence
//!
//! Save a station's dock tree to a layout file and rebuild it later from the
//! same set of named panels. The `try_*` functions return `Result`; the
//! plain variants log failures and report `bool` for UI call sites.

pub mod document;
pub mod host;
pub mod restore;
pub mod serialize;

use std::path::Path;

pub use document::{Element, ElementKind, LayoutDocument};
pub use host::{DockHost, NodeClass};
pub use restore::{restore, Restored};
pub use serialize::{serialize, SaveOptions};

use crate::error::Result;
use crate::model::StationId;
use crate::tracing::LayoutSummary;

/// Serialize `station` and write it to `path`
///
/// The document is rendered and summarized in memory first; nothing is
/// written when either step fails.
pub fn try_save_layout<H: DockHost + ?Sized>(
    host: &H,
    station: StationId,
    path: &Path,
    options: &SaveOptions,
) -> Result<()> {
    let document = serialize(host, station, options)?;
    let summary = LayoutSummary::collect(host, station)?;
    document.write(path, options.indent)?;

    tracing::info!(path = %path.display(), %summary, "Saved layout");
    Ok(())
}

pub fn save_layout<H: DockHost + ?Sized>(
    host: &H,
    station: StationId,
    path: &Path,
    options: &SaveOptions,
) -> bool {
    match try_save_layout(host, station, path, options) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to save layout to {}: {}", path.display(), e);
            false
        }
    }
}

/// Read `path` and rebuild `station` from it
///
/// A file that fails to parse leaves the station untouched; any later
/// failure leaves the station's leaves undocked.
pub fn try_restore_layout<H: DockHost + ?Sized>(
    host: &mut H,
    station: StationId,
    path: &Path,
) -> Result<Restored> {
    let document = LayoutDocument::read(path)?;

    let before = LayoutSummary::collect(host, station)?;
    let restored = restore(&document, host, station)?;
    let after = LayoutSummary::collect(host, station)?;

    if let Some(diff) = before.diff(&after) {
        tracing::debug!(station = station.0, "Layout changed: {}", diff);
    }
    tracing::info!(
        path = %path.display(),
        summary = %after,
        unplaced = restored.unplaced.len(),
        "Restored layout"
    );
    Ok(restored)
}

pub fn restore_layout<H: DockHost + ?Sized>(host: &mut H, station: StationId, path: &Path) -> bool {
    match try_restore_layout(host, station, path) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Failed to restore layout from {}: {}", path.display(), e);
            false
        }
    }
}
