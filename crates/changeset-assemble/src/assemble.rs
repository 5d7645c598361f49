use changeset_core::{
    BumpType, Changeset, Config, DependentsGraph, PackageInfo, PreState, SnapshotConfig,
};
use changeset_version::{PreSuffix, VersionError, increment_version, snapshot_version};
use tracing::{debug, trace};

use crate::dependents::determine_dependents;
use crate::error::{AssembleError, Result};
use crate::flatten::flatten_releases;
use crate::links::apply_links;
use crate::pre::{TrackedPre, track_prerelease};
use crate::types::{PackageMap, PlannedRelease, PreInfo, Release, ReleaseMap, ReleasePlan};

/// Computes the release plan for a set of changesets.
///
/// Each package in the plan gets one bump type that accounts for its direct
/// changesets, for releases of packages it depends on and for its linked
/// group. In a prerelease session versions are derived from the session
/// baseline and carry a `-<tag>.<counter>` suffix; with a snapshot every
/// version is replaced by `0.0.0-<tag>-<commit>`.
///
/// Releases whose bump type is still `none` after propagation are left out of
/// the plan rather than failing with `VersionError::NoneBump`: changesets may
/// request `none` explicitly, so such a release is a no-op, not a bug.
///
/// # Errors
///
/// Returns `AssembleError` if a version cannot be parsed or incremented
/// (including component or prerelease counter overflow), or the prerelease
/// bookkeeping is inconsistent. No partial plan is returned.
pub fn assemble_release_plan(
    changesets: &[Changeset],
    packages: &[PackageInfo],
    config: &Config,
    pre_state: Option<&PreState>,
    snapshot: Option<&SnapshotConfig>,
) -> Result<ReleasePlan> {
    let (applied, working_packages, pre) = match pre_state {
        Some(state) => {
            let TrackedPre {
                info,
                changesets: fresh,
                packages: baseline,
            } = track_prerelease(state, packages, &config.linked, changesets)?;
            (fresh, baseline, Some(info))
        }
        None => (
            changesets.to_vec(),
            packages
                .iter()
                .map(|pkg| (pkg.name.clone(), pkg.clone()))
                .collect::<PackageMap>(),
            None,
        ),
    };

    let mut releases = flatten_releases(&applied, &working_packages);

    if let Some(info) = &pre {
        if info.is_exiting() {
            add_exit_releases(&mut releases, &working_packages, info);
        } else {
            apply_session_bump_types(&mut releases, changesets, &working_packages)?;
        }
    }

    let graph = DependentsGraph::from_packages(packages);
    run_to_fixpoint(
        &mut releases,
        &working_packages,
        &graph,
        &config.linked,
        pre.as_ref(),
    );

    let releases = finalize_releases(releases, pre.as_ref(), snapshot)?;

    Ok(ReleasePlan {
        changesets: applied,
        releases,
        pre_state: pre.map(|info| info.state),
    })
}

/// Alternates dependent propagation and linked-group synchronization until
/// neither changes the release map.
///
/// Bump types only ever rise and the map is bounded by the package count, so
/// the loop terminates.
pub fn run_to_fixpoint(
    releases: &mut ReleaseMap,
    packages: &PackageMap,
    graph: &DependentsGraph,
    linked: &[Vec<String>],
    pre: Option<&PreInfo>,
) {
    let mut passes = 0usize;
    loop {
        passes += 1;
        let dependents_added = determine_dependents(releases, packages, graph, pre);
        let links_updated = apply_links(releases, packages, linked);
        trace!(passes, dependents_added, links_updated, "fixpoint pass");

        if !dependents_added && !links_updated {
            break;
        }
    }
    debug!(passes, releases = releases.len(), "release map converged");
}

/// Every package that moved during the session gets a final release on exit.
fn add_exit_releases(releases: &mut ReleaseMap, packages: &PackageMap, pre: &PreInfo) {
    for (name, package) in packages {
        if pre.touched.contains(name) && !releases.contains_key(name) {
            debug!(package = %name, "adding exit release for package bumped during prerelease");
            releases.insert(name.clone(), Release::implicit(package, BumpType::Patch));
        }
    }
}

/// Inside a session the bump type reflects every changeset seen so far, even
/// though only fresh ones are recorded as reasons for the release.
fn apply_session_bump_types(
    releases: &mut ReleaseMap,
    all_changesets: &[Changeset],
    packages: &PackageMap,
) -> Result<()> {
    let cumulative = flatten_releases(all_changesets, packages);

    for (name, release) in releases.iter_mut() {
        let full = cumulative
            .get(name)
            .ok_or_else(|| AssembleError::MissingUnfilteredRelease {
                package: name.clone(),
            })?;
        release.bump_type = full.bump_type;
    }

    Ok(())
}

fn finalize_releases(
    releases: ReleaseMap,
    pre: Option<&PreInfo>,
    snapshot: Option<&SnapshotConfig>,
) -> Result<Vec<PlannedRelease>> {
    let session = pre.filter(|info| !info.is_exiting());

    releases
        .into_values()
        .filter(|release| {
            let keep = !release.bump_type.is_none();
            if !keep {
                debug!(package = %release.name, "dropping release with bump type none");
            }
            keep
        })
        .map(|release| -> Result<PlannedRelease> {
            let new_version = match (snapshot, session) {
                (Some(snapshot), _) => snapshot_version(snapshot),
                (None, Some(info)) => {
                    let counter = info.counter(&release.name).ok_or_else(|| {
                        VersionError::MissingPreCounter {
                            package: release.name.clone(),
                        }
                    })?;
                    let suffix = PreSuffix {
                        tag: &info.state.tag,
                        counter,
                    };
                    increment_version(&release.old_version, release.bump_type, Some(suffix))?
                }
                (None, None) => {
                    increment_version(&release.old_version, release.bump_type, None)?
                }
            };
            trace!(
                package = %release.name,
                old = %release.old_version,
                new = %new_version,
                bump = %release.bump_type,
                "derived version"
            );

            Ok(PlannedRelease {
                name: release.name,
                bump_type: release.bump_type,
                changesets: release.changesets,
                old_version: release.old_version,
                new_version,
            })
        })
        .collect()
}
