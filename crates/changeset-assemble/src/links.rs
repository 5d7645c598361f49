use changeset_core::BumpType;
use tracing::debug;

use crate::types::{PackageMap, Release, ReleaseMap};

/// Gives every member of a linked group the highest bump type in the group.
///
/// Groups without a releasing member are left untouched. Returns `true` if a
/// release was inserted or raised.
pub fn apply_links(releases: &mut ReleaseMap, packages: &PackageMap, linked: &[Vec<String>]) -> bool {
    let mut updated = false;

    for group in linked {
        let highest = group
            .iter()
            .filter_map(|member| releases.get(member))
            .map(|release| release.bump_type)
            .max()
            .unwrap_or(BumpType::None);

        if highest.is_none() {
            continue;
        }

        for member in group {
            match releases.get_mut(member) {
                Some(release) => {
                    if release.bump_type < highest {
                        debug!(package = %member, bump = %highest, "raising linked release");
                        release.bump_type = highest;
                        updated = true;
                    }
                }
                None => {
                    let Some(package) = packages.get(member) else {
                        continue;
                    };
                    debug!(package = %member, bump = %highest, "adding linked release");
                    releases.insert(member.clone(), Release::implicit(package, highest));
                    updated = true;
                }
            }
        }
    }

    updated
}
