//! Tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! save/restore decisions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=dockyard::layout::restore=debug` - per-element restore decisions
//!
//! # Log Files
//!
//! Logs are written to `~/.config/dockyard/logs/dockyard.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use std::fmt;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::Result;
use crate::layout::{DockHost, NodeClass};
use crate::model::{NodeId, StationId};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). File logging writes to
/// `~/.config/dockyard/logs/dockyard.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_NAME);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight count of a station's tree for before/after logging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutSummary {
    pub splitters: usize,
    pub tabbers: usize,
    pub sub_stations: usize,
    pub leaves: usize,
    pub floating: usize,
    /// Longest root-to-leaf chain, passthrough wrappers not counted
    pub depth: usize,
}

impl LayoutSummary {
    pub fn collect<H: DockHost + ?Sized>(host: &H, station: StationId) -> Result<Self> {
        let mut summary = Self::default();
        summary.add_station(host, station, 0)?;
        Ok(summary)
    }

    fn add_station<H: DockHost + ?Sized>(
        &mut self,
        host: &H,
        station: StationId,
        depth: usize,
    ) -> Result<()> {
        self.floating += host.floating_leaves(station)?.len();
        if let Some(root) = host.station_root(station)? {
            self.add_node(host, root, depth + 1)?;
        }
        Ok(())
    }

    fn add_node<H: DockHost + ?Sized>(&mut self, host: &H, node: NodeId, depth: usize) -> Result<()> {
        self.depth = self.depth.max(depth);
        match host.classify(node)? {
            NodeClass::Splitter { first, second, .. } => {
                self.splitters += 1;
                for child in [first, second].into_iter().flatten() {
                    self.add_node(host, child, depth + 1)?;
                }
            }
            NodeClass::Tabber { tabs } => {
                self.tabbers += 1;
                for &tab in tabs {
                    self.add_node(host, tab, depth + 1)?;
                }
            }
            NodeClass::SubStation { station, .. } => {
                self.sub_stations += 1;
                self.add_station(host, station, depth)?;
            }
            NodeClass::Leaf { .. } => self.leaves += 1,
            NodeClass::Passthrough { children } => {
                for &child in children {
                    self.add_node(host, child, depth)?;
                }
            }
        }
        Ok(())
    }

    /// Generate a diff description between two summaries
    pub fn diff(&self, other: &LayoutSummary) -> Option<String> {
        let fields = [
            ("splitters", self.splitters, other.splitters),
            ("tabbers", self.tabbers, other.tabbers),
            ("sub-stations", self.sub_stations, other.sub_stations),
            ("leaves", self.leaves, other.leaves),
            ("floating", self.floating, other.floating),
            ("depth", self.depth, other.depth),
        ];

        let changes: Vec<String> = fields
            .iter()
            .filter(|(_, before, after)| before != after)
            .map(|(name, before, after)| format!("{}: {} → {}", name, before, after))
            .collect();

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

impl fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} leaves ({} floating), {} splitters, {} tab groups, {} sub-stations, depth {}",
            self.leaves, self.floating, self.splitters, self.tabbers, self.sub_stations, self.depth
        )
    }
}
