use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use dockyard::cli::{sample_station, scratch_station, CliArgs, Command};
use dockyard::config::DockyardConfig;
use dockyard::dump::{outline, StationDump};
use dockyard::layout::{restore, try_save_layout, LayoutDocument, SaveOptions};
use dockyard::tracing::LayoutSummary;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    dockyard::tracing::init();

    let config = match &args.config {
        Some(path) => DockyardConfig::load_from(path),
        None => DockyardConfig::load(),
    };

    match args.command {
        Command::Show { file, json } => show(&file, json),
        Command::Check { file } => check(&file),
        Command::Demo { out } => {
            let path = match out.or_else(|| config.layout_path()) {
                Some(path) => path,
                None => bail!("No output path given and no config directory available"),
            };
            demo(&path, &SaveOptions::from(&config))
        }
    }
}

fn show(file: &Path, json: bool) -> Result<()> {
    let document = LayoutDocument::read(file)
        .with_context(|| format!("Failed to read layout {}", file.display()))?;

    if !json {
        print!("{}", outline(&document));
        return Ok(());
    }

    let (mut tree, station) = scratch_station(&document)?;
    restore(&document, &mut tree, station)
        .with_context(|| format!("Failed to restore layout {}", file.display()))?;
    let dump = StationDump::collect(&tree, station)?;
    println!("{}", dump.to_json()?);
    Ok(())
}

fn check(file: &Path) -> Result<()> {
    let document = LayoutDocument::read(file)
        .with_context(|| format!("Failed to read layout {}", file.display()))?;

    let (mut tree, station) = scratch_station(&document)?;
    let restored = restore(&document, &mut tree, station)
        .with_context(|| format!("Layout {} does not restore", file.display()))?;
    tree.assert_invariants();

    let summary = LayoutSummary::collect(&tree, station)?;
    println!("{}: ok", file.display());
    println!("  {}", summary);
    if !restored.unplaced.is_empty() {
        println!("  {} leaves named but never placed", restored.unplaced.len());
    }
    Ok(())
}

fn demo(path: &Path, options: &SaveOptions) -> Result<()> {
    let (tree, station) = sample_station()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    try_save_layout(&tree, station, path, options)
        .with_context(|| format!("Failed to save layout to {}", path.display()))?;
    println!("Wrote sample layout to {}", path.display());
    Ok(())
}
