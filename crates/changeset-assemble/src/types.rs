use changeset_core::{BumpType, Changeset, PackageInfo, PreState};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Work-in-progress release of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub name: String,
    pub bump_type: BumpType,
    /// Ids of the changesets that directly requested this release.
    pub changesets: Vec<String>,
    /// Version the increment is computed from. Fixed at insertion.
    pub old_version: String,
}

impl Release {
    /// A release forced by propagation or linking rather than a changeset.
    #[must_use]
    pub fn implicit(package: &PackageInfo, bump_type: BumpType) -> Self {
        Self {
            name: package.name.clone(),
            bump_type,
            changesets: Vec::new(),
            old_version: package.version.clone(),
        }
    }
}

/// Releases keyed by package name, one entry per package.
pub type ReleaseMap = IndexMap<String, Release>;

/// Packages keyed by name, carrying the version increments start from.
pub type PackageMap = IndexMap<String, PackageInfo>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRelease {
    pub name: String,
    pub bump_type: BumpType,
    pub changesets: Vec<String>,
    pub old_version: String,
    pub new_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    /// Changesets applied by this plan.
    pub changesets: Vec<Changeset>,
    pub releases: Vec<PlannedRelease>,
    /// Updated prerelease state for the caller to persist.
    pub pre_state: Option<PreState>,
}

impl ReleasePlan {
    #[must_use]
    pub fn release(&self, name: &str) -> Option<&PlannedRelease> {
        self.releases.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

/// Prerelease bookkeeping derived for a single assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreInfo {
    pub state: PreState,
    /// Counter the next prerelease of each package uses. Only populated in
    /// `pre` mode.
    pub pre_versions: IndexMap<String, u64>,
    /// Packages whose version moved since the session started.
    pub touched: IndexSet<String>,
}

impl PreInfo {
    #[must_use]
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.pre_versions.get(name).copied()
    }

    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.state.is_exiting()
    }

    /// Whether a package must be left out of dependent propagation.
    ///
    /// In `pre` mode a package without a counter is not part of the session.
    #[must_use]
    pub fn excludes_from_propagation(&self, name: &str) -> bool {
        !self.is_exiting() && !self.pre_versions.contains_key(name)
    }
}
