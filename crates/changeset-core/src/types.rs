use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ChangesetError;

/// Severity of a version change.
///
/// `None` is a real member of the lattice, so `max` over a set of requests
/// never needs to special-case absence.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl BumpType {
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpType {
    type Err = ChangesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            other => Err(ChangesetError::UnknownBumpType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRelease {
    pub name: String,
    pub bump_type: BumpType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// Stable identifier, the changeset file stem.
    pub id: String,
    pub summary: String,
    pub releases: Vec<PackageRelease>,
}

/// A package of the project as it currently exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    /// Current version string. Parsed lazily by version derivation.
    pub version: String,
    pub path: PathBuf,
    /// Names of other project packages this one depends on.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreMode {
    Pre,
    Exit,
}

impl fmt::Display for PreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => f.write_str("pre"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// Prerelease session bookkeeping, persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PreState {
    pub mode: PreMode,
    pub tag: String,
    /// Changeset ids already consumed in this session.
    #[serde(default)]
    pub changesets: Vec<String>,
    /// Version of every package at the time it was first seen in the session.
    #[serde(default)]
    pub initial_versions: IndexMap<String, String>,
}

impl PreState {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            mode: PreMode::Pre,
            tag: tag.into(),
            changesets: Vec::new(),
            initial_versions: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.mode == PreMode::Exit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub tag: String,
    pub commit_hash: String,
}

/// Release-relevant settings loaded from project metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Groups of packages that always release with the same bump type.
    pub linked: Vec<Vec<String>>,
    pub commit: bool,
}
