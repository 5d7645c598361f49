use std::collections::HashSet;
use std::path::{Path, PathBuf};

use changeset_core::{Config, PackageInfo};

use crate::error::ProjectError;
use crate::manifest::{ChangesetMetadata, read_manifest};
use crate::project::{CargoProject, ProjectKind};

/// Changeset settings read from the root manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    release: Config,
    changeset_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            release: Config::default(),
            changeset_dir: PathBuf::from(crate::DEFAULT_CHANGESET_DIR),
        }
    }
}

impl ProjectConfig {
    /// Settings consumed by release planning.
    #[must_use]
    pub fn release(&self) -> &Config {
        &self.release
    }

    #[must_use]
    pub fn linked(&self) -> &[Vec<String>] {
        &self.release.linked
    }

    /// Changeset directory relative to the project root.
    #[must_use]
    pub fn changeset_dir(&self) -> &Path {
        &self.changeset_dir
    }

    fn from_metadata(metadata: Option<ChangesetMetadata>) -> Self {
        let Some(metadata) = metadata else {
            return Self::default();
        };

        Self {
            release: Config {
                linked: metadata.linked,
                commit: metadata.commit.unwrap_or(false),
            },
            changeset_dir: metadata
                .changeset_dir
                .map_or_else(|| PathBuf::from(crate::DEFAULT_CHANGESET_DIR), PathBuf::from),
        }
    }
}

/// Loads `[workspace.metadata.changeset]` (or `[package.metadata.changeset]`
/// for single packages) and validates linked groups against the project.
///
/// # Errors
///
/// Returns `ProjectError` if the root manifest cannot be read or a linked group
/// is invalid.
pub fn load_config(project: &CargoProject) -> Result<ProjectConfig, ProjectError> {
    let manifest = read_manifest(&project.manifest_path())?;

    let metadata = match project.kind {
        ProjectKind::SinglePackage => manifest
            .package
            .and_then(|pkg| pkg.metadata)
            .and_then(|meta| meta.changeset),
        ProjectKind::VirtualWorkspace | ProjectKind::WorkspaceWithRoot => manifest
            .workspace
            .and_then(|ws| ws.metadata)
            .and_then(|meta| meta.changeset),
    };

    let config = ProjectConfig::from_metadata(metadata);
    validate_linked_groups(config.linked(), &project.packages)?;
    Ok(config)
}

/// Every linked package must exist and belong to at most one group.
///
/// # Errors
///
/// Returns `ProjectError::UnknownLinkedPackage` or
/// `ProjectError::DuplicateLinkedPackage`.
pub fn validate_linked_groups(
    linked: &[Vec<String>],
    packages: &[PackageInfo],
) -> Result<(), ProjectError> {
    let known: HashSet<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    for member in linked.iter().flatten() {
        if !known.contains(member.as_str()) {
            return Err(ProjectError::UnknownLinkedPackage {
                package: member.clone(),
            });
        }
        if !seen.insert(member.as_str()) {
            return Err(ProjectError::DuplicateLinkedPackage {
                package: member.clone(),
            });
        }
    }

    Ok(())
}
