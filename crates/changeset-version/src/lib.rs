mod error;

use changeset_core::{BumpType, SnapshotConfig};
use semver::Version;

pub use error::VersionError;

/// Prerelease suffix applied on top of an ordinary increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreSuffix<'a> {
    pub tag: &'a str,
    pub counter: u64,
}

/// # Errors
///
/// Returns `VersionError::InvalidVersion` if `version` is not valid semver.
pub fn parse_version(version: &str) -> Result<Version, VersionError> {
    Version::parse(version).map_err(|source| VersionError::InvalidVersion {
        version: version.to_string(),
        source,
    })
}

/// Applies a semantic version increment.
///
/// A version that already carries a prerelease is promoted to the release it
/// was leading up to when that release satisfies the bump, so `1.1.0-rc.1`
/// bumped by minor becomes `1.1.0`, not `1.2.0`. Build metadata is dropped.
///
/// # Errors
///
/// Returns `VersionError::NoneBump` for `BumpType::None` and
/// `VersionError::ComponentOverflow` if the bumped component is `u64::MAX`.
pub fn bump_version(version: &Version, bump_type: BumpType) -> Result<Version, VersionError> {
    let is_pre = !version.pre.is_empty();
    let mut new_version = Version::new(version.major, version.minor, version.patch);

    let step = |value: u64, component: &'static str| {
        value
            .checked_add(1)
            .ok_or_else(|| VersionError::ComponentOverflow {
                version: version.to_string(),
                bump_type,
                component,
            })
    };

    match bump_type {
        BumpType::Major => {
            if !(is_pre && version.minor == 0 && version.patch == 0) {
                new_version.major = step(version.major, "major")?;
            }
            new_version.minor = 0;
            new_version.patch = 0;
        }
        BumpType::Minor => {
            if !(is_pre && version.patch == 0) {
                new_version.minor = step(version.minor, "minor")?;
            }
            new_version.patch = 0;
        }
        BumpType::Patch => {
            if !is_pre {
                new_version.patch = step(version.patch, "patch")?;
            }
        }
        BumpType::None => {
            return Err(VersionError::NoneBump {
                version: version.to_string(),
                bump_type,
            });
        }
    }

    Ok(new_version)
}

/// Derives the new version string for a release.
///
/// With a `pre` suffix the result is `<base>-<tag>.<counter>`.
///
/// # Errors
///
/// Returns `VersionError` if `old_version` cannot be parsed or `bump_type` is
/// `BumpType::None`.
pub fn increment_version(
    old_version: &str,
    bump_type: BumpType,
    pre: Option<PreSuffix<'_>>,
) -> Result<String, VersionError> {
    let base = bump_version(&parse_version(old_version)?, bump_type)?;
    Ok(match pre {
        Some(PreSuffix { tag, counter }) => format!("{base}-{tag}.{counter}"),
        None => base.to_string(),
    })
}

/// Returns the prerelease counter the next prerelease of `version` should use.
///
/// The counter is the second prerelease identifier (`1.0.1-next.3` → 3) plus
/// one, or 0 when the version has no counter yet.
///
/// # Errors
///
/// Returns `VersionError` if the version cannot be parsed, its counter
/// identifier is not an integer, or the counter is already `u64::MAX`.
pub fn next_pre_counter(version: &str) -> Result<u64, VersionError> {
    let parsed = parse_version(version)?;
    match parsed.pre.as_str().split('.').nth(1) {
        None => Ok(0),
        Some(identifier) => identifier
            .parse::<u64>()
            .map_err(|_| VersionError::NonNumericPrerelease {
                version: version.to_string(),
                identifier: identifier.to_string(),
            })?
            .checked_add(1)
            .ok_or_else(|| VersionError::PreCounterOverflow {
                version: version.to_string(),
            }),
    }
}

#[must_use]
pub fn snapshot_version(snapshot: &SnapshotConfig) -> String {
    format!("0.0.0-{}-{}", snapshot.tag, snapshot.commit_hash)
}
