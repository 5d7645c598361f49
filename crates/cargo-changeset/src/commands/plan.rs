use std::path::Path;

use changeset_assemble::assemble_release_plan;
use changeset_core::{PreMode, SnapshotConfig};
use changeset_project::{discover_project, load_config, read_changesets, read_pre_state};
use tracing::debug;

use super::PlanArgs;
use crate::error::Result;
use crate::output::{JsonPlanFormatter, PlainTextPlanFormatter, PlanFormatter, PRERELEASE_BANNER};

fn snapshot_config(args: &PlanArgs) -> Option<SnapshotConfig> {
    match (&args.snapshot, &args.commit_hash) {
        (Some(tag), Some(commit_hash)) => Some(SnapshotConfig {
            tag: tag.clone(),
            commit_hash: commit_hash.clone(),
        }),
        _ => None,
    }
}

pub(crate) fn run(args: &PlanArgs, start_path: &Path) -> Result<()> {
    let project = discover_project(start_path)?;
    let config = load_config(&project)?;
    let changeset_dir = project.root.join(config.changeset_dir());

    let changesets = read_changesets(&changeset_dir)?;
    let pre_state = read_pre_state(&changeset_dir)?;
    debug!(
        changesets = changesets.len(),
        pre_mode = ?pre_state.as_ref().map(|s| s.mode),
        "loaded planning inputs"
    );

    if pre_state.as_ref().is_some_and(|s| s.mode == PreMode::Pre) {
        eprint!("{PRERELEASE_BANNER}");
    }

    let exiting = pre_state.as_ref().is_some_and(|s| s.is_exiting());
    if changesets.is_empty() && !exiting {
        eprintln!("No unreleased changesets found.");
        return Ok(());
    }

    let snapshot = snapshot_config(args);
    let plan = assemble_release_plan(
        &changesets,
        &project.packages,
        config.release(),
        pre_state.as_ref(),
        snapshot.as_ref(),
    )?;

    let rendered = if args.json {
        JsonPlanFormatter.format(&plan)?
    } else {
        PlainTextPlanFormatter.format(&plan)?
    };
    print!("{rendered}");

    Ok(())
}
