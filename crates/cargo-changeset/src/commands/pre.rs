use std::path::Path;

use changeset_project::{discover_project, enter_pre, exit_pre, load_config};

use crate::error::Result;

pub(crate) fn enter(tag: &str, start_path: &Path) -> Result<()> {
    let project = discover_project(start_path)?;
    let config = load_config(&project)?;
    let changeset_dir = project.root.join(config.changeset_dir());

    let state = enter_pre(&changeset_dir, tag, &project.packages)?;

    println!(
        "Entered prerelease mode with tag '{}' ({} packages recorded).",
        state.tag,
        state.initial_versions.len()
    );
    println!("Run `cargo changeset plan` to compute prerelease versions.");
    Ok(())
}

pub(crate) fn exit(start_path: &Path) -> Result<()> {
    let project = discover_project(start_path)?;
    let config = load_config(&project)?;
    let changeset_dir = project.root.join(config.changeset_dir());

    let state = exit_pre(&changeset_dir)?;

    println!("Exiting prerelease mode '{}'.", state.tag);
    println!("The next plan releases every package at its final version.");
    Ok(())
}
