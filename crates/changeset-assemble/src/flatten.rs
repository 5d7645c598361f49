use changeset_core::Changeset;
use tracing::debug;

use crate::types::{PackageMap, Release, ReleaseMap};

/// Collapses the bump requests of all changesets into one release per package.
///
/// A package requested more than once gets the highest bump type. Requests
/// for names missing from `packages` are dropped.
#[must_use]
pub fn flatten_releases(changesets: &[Changeset], packages: &PackageMap) -> ReleaseMap {
    let mut releases = ReleaseMap::new();

    for changeset in changesets {
        for request in &changeset.releases {
            let Some(package) = packages.get(&request.name) else {
                debug!(
                    changeset = %changeset.id,
                    package = %request.name,
                    "ignoring release of unknown package"
                );
                continue;
            };

            let release = releases
                .entry(request.name.clone())
                .or_insert_with(|| Release {
                    name: package.name.clone(),
                    bump_type: request.bump_type,
                    changesets: Vec::new(),
                    old_version: package.version.clone(),
                });
            release.bump_type = release.bump_type.max(request.bump_type);
            release.changesets.push(changeset.id.clone());
        }
    }

    releases
}
