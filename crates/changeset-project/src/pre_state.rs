use std::fs;
use std::path::{Path, PathBuf};

use changeset_core::{PackageInfo, PreMode, PreState};
use tracing::info;

use crate::error::ProjectError;

pub const PRE_STATE_FILENAME: &str = "pre.toml";

fn pre_state_path(changeset_dir: &Path) -> PathBuf {
    changeset_dir.join(PRE_STATE_FILENAME)
}

/// Loads `pre.toml` from `changeset_dir`. A missing file means no
/// prerelease session.
///
/// # Errors
///
/// Returns `ProjectError` if the file exists but cannot be read or parsed.
pub fn read_pre_state(changeset_dir: &Path) -> Result<Option<PreState>, ProjectError> {
    let path = pre_state_path(changeset_dir);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|source| ProjectError::PreStateRead {
        path: path.clone(),
        source,
    })?;
    let state = toml::from_str(&content)
        .map_err(|source| ProjectError::PreStateParse { path, source })?;

    Ok(Some(state))
}

/// Writes `state` to `pre.toml`, creating `changeset_dir` if needed.
///
/// # Errors
///
/// Returns `ProjectError` if serialization or writing fails.
pub fn write_pre_state(changeset_dir: &Path, state: &PreState) -> Result<(), ProjectError> {
    let path = pre_state_path(changeset_dir);

    let content =
        toml::to_string_pretty(state).map_err(|source| ProjectError::PreStateSerialize {
            path: path.clone(),
            source,
        })?;
    fs::create_dir_all(changeset_dir).map_err(|source| ProjectError::PreStateWrite {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, content).map_err(|source| ProjectError::PreStateWrite { path, source })?;

    Ok(())
}

/// Starts a prerelease session tagged `tag`, recording the current version of
/// every package. Changesets consumed by an exiting session stay consumed.
///
/// # Errors
///
/// Returns `ProjectError::AlreadyInPreMode` if a session is active, or an I/O
/// error from reading or writing the state file.
pub fn enter_pre(
    changeset_dir: &Path,
    tag: &str,
    packages: &[PackageInfo],
) -> Result<PreState, ProjectError> {
    let previous = read_pre_state(changeset_dir)?;
    if let Some(active) = previous.as_ref().filter(|s| s.mode == PreMode::Pre) {
        return Err(ProjectError::AlreadyInPreMode {
            tag: active.tag.clone(),
        });
    }

    let mut state = PreState::new(tag);
    if let Some(previous) = previous {
        state.changesets = previous.changesets;
    }
    state.initial_versions = packages
        .iter()
        .map(|p| (p.name.clone(), p.version.clone()))
        .collect();

    write_pre_state(changeset_dir, &state)?;
    info!(tag, packages = packages.len(), "entered prerelease mode");
    Ok(state)
}

/// Marks the active prerelease session as exiting. The next plan releases
/// every package touched during the session at its final version.
///
/// # Errors
///
/// Returns `ProjectError::NotInPreMode` if no session is active, or an I/O
/// error from reading or writing the state file.
pub fn exit_pre(changeset_dir: &Path) -> Result<PreState, ProjectError> {
    let mut state = read_pre_state(changeset_dir)?
        .filter(|s| s.mode == PreMode::Pre)
        .ok_or(ProjectError::NotInPreMode)?;

    state.mode = PreMode::Exit;
    write_pre_state(changeset_dir, &state)?;
    info!(tag = %state.tag, "exiting prerelease mode");
    Ok(state)
}
