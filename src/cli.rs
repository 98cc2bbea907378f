//! Command-line interface for the `dockyard` binary
//!
//! Supports:
//! - Printing the outline of a layout file
//! - Checking a layout file against a scratch tree
//! - Writing a sample layout

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::layout::LayoutDocument;
use crate::model::{DockTarget, DockTree, StationId};
use crate::panel::{DockPosition, Geometry, Panel};

/// Save, inspect and restore docking layouts
#[derive(Parser, Debug)]
#[command(name = "dockyard", version, about = "Save, inspect and restore docking layouts")]
pub struct CliArgs {
    /// Read configuration from this file instead of the config directory
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the element outline of a layout file
    Show {
        file: PathBuf,
        /// Print the restored tree as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Restore a layout file into a scratch tree and report the result
    Check { file: PathBuf },
    /// Build a sample station and save its layout
    Demo {
        /// Output path (defaults to the configured layout file)
        out: Option<PathBuf>,
    },
}

/// A station holding one leaf per distinct name in `document`
///
/// The leaves are docked as a single tab group so a restore pools all of
/// them.
pub fn scratch_station(document: &LayoutDocument) -> Result<(DockTree, StationId)> {
    let mut tree = DockTree::new();
    let station = tree.create_station();

    let names: BTreeSet<&str> = document.leaf_names().into_iter().collect();
    let mut anchor = None;
    for name in names {
        let leaf = tree.add_leaf(Panel::titled(name));
        let target = match anchor {
            Some(anchor) => DockTarget::Node(anchor),
            None => DockTarget::Station(station),
        };
        tree.dock(leaf, target, DockPosition::Center, None)?;
        if anchor.is_none() {
            anchor = Some(leaf);
        }
    }
    Ok((tree, station))
}

/// Sample workspace: side trees, editor, console, a tools sub-station and a
/// floating leaf
pub fn sample_station() -> Result<(DockTree, StationId)> {
    let mut tree = DockTree::new();
    let station = tree.create_station();

    let editor = tree.add_leaf(Panel::new("Editor", "main.rs"));
    tree.dock(editor, DockTarget::Station(station), DockPosition::Center, None)?;

    let console = tree.add_leaf(Panel::titled("Console"));
    tree.dock(console, DockTarget::Node(editor), DockPosition::Bottom, Some(0.7))?;

    let tree_1 = tree.add_leaf(Panel::titled("Tree 1"));
    tree.dock(tree_1, DockTarget::Node(editor), DockPosition::Left, Some(0.25))?;
    let tree_2 = tree.add_leaf(Panel::titled("Tree 2"));
    tree.dock(tree_2, DockTarget::Node(tree_1), DockPosition::Center, None)?;

    let (tools, nested) = tree.create_sub_station(station, "Tools")?;
    let inspector = tree.add_leaf(Panel::titled("Inspector"));
    tree.dock(inspector, DockTarget::Station(nested), DockPosition::Center, None)?;
    let palette = tree.add_leaf(Panel::titled("Palette"));
    tree.dock(palette, DockTarget::Node(inspector), DockPosition::Bottom, Some(0.6))?;
    tree.dock(tools, DockTarget::Node(editor), DockPosition::Right, Some(0.75))?;

    let floater = tree.add_leaf(Panel::titled("Floater1"));
    tree.float_leaf(station, floater, Geometry::new(120.0, 40.0, 300.0, 200.0))?;

    tree.assert_invariants();
    Ok((tree, station))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_with_json_flag() {
        let args = CliArgs::try_parse_from(["dockyard", "show", "layout.xml", "--json"]).unwrap();
        assert_eq!(
            args.command,
            Command::Show {
                file: PathBuf::from("layout.xml"),
                json: true
            }
        );
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_check_requires_file() {
        assert!(CliArgs::try_parse_from(["dockyard", "check"]).is_err());
    }

    #[test]
    fn test_demo_output_is_optional() {
        let args = CliArgs::try_parse_from(["dockyard", "demo"]).unwrap();
        assert_eq!(args.command, Command::Demo { out: None });
    }

    #[test]
    fn test_global_config_flag() {
        let args =
            CliArgs::try_parse_from(["dockyard", "demo", "out.xml", "--config", "c.yaml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("c.yaml")));
        assert_eq!(
            args.command,
            Command::Demo {
                out: Some(PathBuf::from("out.xml"))
            }
        );
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(CliArgs::try_parse_from(["dockyard"]).is_err());
    }

    #[test]
    fn test_scratch_station_pools_every_name() {
        let doc = LayoutDocument::parse(
            r#"<DockStation>
                <DockSplitterContainer dividerPositions="0.5" orientation="VERTICAL">
                    <DockNode name="B"/><DockNode name="A"/>
                </DockSplitterContainer>
                <floating><DockNode name="F" position-x="0.0" position-y="0.0" width="1.0" height="1.0"/></floating>
            </DockStation>"#,
        )
        .unwrap();
        let (tree, station) = scratch_station(&doc).unwrap();
        let titles: Vec<_> = tree
            .docked_leaves(station)
            .into_iter()
            .map(|leaf| tree.title(leaf).unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["A", "B", "F"]);
    }

    #[test]
    fn test_sample_station_shape() {
        let (tree, station) = sample_station().unwrap();
        assert_eq!(tree.docked_leaves(station).len(), 6);
        let floater = tree.find_leaf("Floater1").unwrap();
        assert!(tree.floating_geometry(floater).is_some());
    }
}
