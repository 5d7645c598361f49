use changeset_core::{BumpType, DependentsGraph};
use tracing::debug;

use crate::types::{PackageMap, PreInfo, Release, ReleaseMap};

/// Makes every direct dependent of a releasing package release at least a
/// patch.
///
/// Returns `true` if a release was inserted or raised. Dependents of newly
/// inserted releases are handled by the next call.
pub fn determine_dependents(
    releases: &mut ReleaseMap,
    packages: &PackageMap,
    graph: &DependentsGraph,
    pre: Option<&PreInfo>,
) -> bool {
    let releasing: Vec<String> = releases
        .values()
        .filter(|release| !release.bump_type.is_none())
        .map(|release| release.name.clone())
        .collect();

    let mut updated = false;

    for name in &releasing {
        for dependent in graph.dependents_of(name) {
            if pre.is_some_and(|info| info.excludes_from_propagation(dependent)) {
                continue;
            }

            match releases.get_mut(dependent) {
                Some(release) if release.bump_type < BumpType::Patch => {
                    debug!(package = dependent, dependency = %name, "raising dependent to patch");
                    release.bump_type = BumpType::Patch;
                    updated = true;
                }
                Some(_) => {}
                None => {
                    let Some(package) = packages.get(dependent) else {
                        continue;
                    };
                    debug!(package = dependent, dependency = %name, "adding dependent release");
                    releases.insert(
                        dependent.to_string(),
                        Release::implicit(package, BumpType::Patch),
                    );
                    updated = true;
                }
            }
        }
    }

    updated
}
