use std::collections::HashSet;

use changeset_core::{Changeset, PackageInfo, PreState};
use changeset_version::{VersionError, next_pre_counter};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::types::{PackageMap, PreInfo};

/// Prerelease bookkeeping normalized for one assembly.
#[derive(Debug, Clone)]
pub struct TrackedPre {
    pub info: PreInfo,
    /// Changesets not yet consumed by the session. All changesets when exiting.
    pub changesets: Vec<Changeset>,
    /// Packages with their version reset to the session baseline.
    pub packages: PackageMap,
}

/// Advances a prerelease session by one assembly.
///
/// The returned state is a new value; `state` is left as the caller gave it.
///
/// # Errors
///
/// Returns `VersionError` if a package version cannot be parsed or carries a
/// non-numeric prerelease counter.
pub fn track_prerelease(
    state: &PreState,
    packages: &[PackageInfo],
    linked: &[Vec<String>],
    changesets: &[Changeset],
) -> Result<TrackedPre, VersionError> {
    let mut state = state.clone();

    for package in packages {
        state
            .initial_versions
            .entry(package.name.clone())
            .or_insert_with(|| package.version.clone());
    }

    let mut pre_versions = IndexMap::new();
    let changesets = if state.is_exiting() {
        changesets.to_vec()
    } else {
        let current_ids = changesets.iter().map(|c| c.id.clone()).collect();
        let used: HashSet<String> = std::mem::replace(&mut state.changesets, current_ids)
            .into_iter()
            .collect();

        trace!(changesets = ?state.changesets, "unfiltered changesets");
        let fresh: Vec<Changeset> = changesets
            .iter()
            .filter(|changeset| !used.contains(&changeset.id))
            .cloned()
            .collect();
        debug!(
            consumed = changesets.len() - fresh.len(),
            fresh = fresh.len(),
            "filtered changesets consumed earlier in the prerelease session"
        );

        for package in packages {
            pre_versions.insert(package.name.clone(), next_pre_counter(&package.version)?);
        }
        equalize_linked_counters(&mut pre_versions, linked);

        fresh
    };

    // Only packages whose version moved off the baseline count as touched, so
    // an exiting session does not release every package of the project.
    let touched: IndexSet<String> = packages
        .iter()
        .filter(|package| state.initial_versions.get(&package.name) != Some(&package.version))
        .map(|package| package.name.clone())
        .collect();

    let packages = packages
        .iter()
        .map(|package| {
            let mut package = package.clone();
            if let Some(initial) = state.initial_versions.get(&package.name) {
                package.version.clone_from(initial);
            }
            (package.name.clone(), package)
        })
        .collect();

    Ok(TrackedPre {
        info: PreInfo {
            state,
            pre_versions,
            touched,
        },
        changesets,
        packages,
    })
}

fn equalize_linked_counters(pre_versions: &mut IndexMap<String, u64>, linked: &[Vec<String>]) {
    for group in linked {
        let highest = group
            .iter()
            .filter_map(|member| pre_versions.get(member))
            .copied()
            .max()
            .unwrap_or(0);

        for member in group {
            if let Some(counter) = pre_versions.get_mut(member) {
                *counter = highest;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use changeset_core::{BumpType, PreMode};

    use super::*;
    use crate::fixtures::{linked, make_changeset, make_package};

    #[test]
    fn records_baseline_for_new_packages_only() {
        let mut state = PreState::new("next");
        state
            .initial_versions
            .insert("pkg-a".to_string(), "1.0.0".to_string());
        let packages = vec![
            make_package("pkg-a", "1.0.1-next.0", &[]),
            make_package("pkg-b", "3.0.0", &[]),
        ];

        let tracked = track_prerelease(&state, &packages, &[], &[]).expect("track");

        let initial = &tracked.info.state.initial_versions;
        assert_eq!(initial["pkg-a"], "1.0.0");
        assert_eq!(initial["pkg-b"], "3.0.0");
    }

    #[test]
    fn leaves_caller_state_untouched() {
        let state = PreState::new("next");
        let packages = vec![make_package("pkg-a", "1.0.0", &[])];
        let changesets = vec![make_changeset("cs-1", &[("pkg-a", BumpType::Patch)])];

        let tracked = track_prerelease(&state, &packages, &[], &changesets).expect("track");

        assert!(state.initial_versions.is_empty());
        assert!(state.changesets.is_empty());
        assert_eq!(tracked.info.state.changesets, vec!["cs-1"]);
    }

    #[test]
    fn filters_consumed_changesets_and_replaces_id_list() {
        let mut state = PreState::new("next");
        state.changesets = vec!["cs-1".to_string(), "cs-gone".to_string()];
        let packages = vec![make_package("pkg-a", "1.0.1-next.0", &[])];
        let changesets = vec![
            make_changeset("cs-1", &[("pkg-a", BumpType::Patch)]),
            make_changeset("cs-2", &[("pkg-a", BumpType::Minor)]),
        ];

        let tracked = track_prerelease(&state, &packages, &[], &changesets).expect("track");

        let ids: Vec<_> = tracked.changesets.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cs-2"]);
        assert_eq!(tracked.info.state.changesets, vec!["cs-1", "cs-2"]);
    }

    #[test]
    fn computes_next_counters() {
        let state = PreState::new("next");
        let packages = vec![
            make_package("fresh", "1.0.0", &[]),
            make_package("bumped", "2.0.1-next.4", &[]),
        ];

        let tracked = track_prerelease(&state, &packages, &[], &[]).expect("track");

        assert_eq!(tracked.info.counter("fresh"), Some(0));
        assert_eq!(tracked.info.counter("bumped"), Some(5));
    }

    #[test]
    fn linked_members_share_highest_counter() {
        let state = PreState::new("next");
        let packages = vec![
            make_package("pkg-x", "1.0.1-next.2", &[]),
            make_package("pkg-y", "1.0.0", &[]),
            make_package("pkg-z", "1.0.1-next.7", &[]),
        ];

        let tracked = track_prerelease(&state, &packages, &linked(&[&["pkg-x", "pkg-y"]]), &[])
            .expect("track");

        assert_eq!(tracked.info.counter("pkg-x"), Some(3));
        assert_eq!(tracked.info.counter("pkg-y"), Some(3));
        assert_eq!(tracked.info.counter("pkg-z"), Some(8));
    }

    #[test]
    fn resets_working_versions_to_baseline() {
        let mut state = PreState::new("next");
        state
            .initial_versions
            .insert("pkg-a".to_string(), "1.0.0".to_string());
        let packages = vec![make_package("pkg-a", "1.0.1-next.3", &[])];

        let tracked = track_prerelease(&state, &packages, &[], &[]).expect("track");

        assert_eq!(tracked.packages["pkg-a"].version, "1.0.0");
        assert!(tracked.info.touched.contains("pkg-a"));
    }

    #[test]
    fn exit_mode_neither_filters_nor_counts() {
        let mut state = PreState::new("next");
        state.mode = PreMode::Exit;
        state.changesets = vec!["cs-1".to_string()];
        let packages = vec![make_package("pkg-a", "1.0.0", &[])];
        let changesets = vec![make_changeset("cs-1", &[("pkg-a", BumpType::Patch)])];

        let tracked = track_prerelease(&state, &packages, &[], &changesets).expect("track");

        assert_eq!(tracked.changesets.len(), 1);
        assert!(tracked.info.pre_versions.is_empty());
        assert_eq!(tracked.info.state.changesets, vec!["cs-1"]);
    }

    #[test]
    fn non_numeric_counter_is_an_error() {
        let state = PreState::new("next");
        let packages = vec![make_package("pkg-a", "1.0.0-next.final", &[])];

        let err = track_prerelease(&state, &packages, &[], &[]).expect_err("should fail");

        assert!(matches!(err, VersionError::NonNumericPrerelease { .. }));
    }
}
