use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use changeset_core::PackageInfo;
use globset::GlobBuilder;
use semver::Version;
use tracing::debug;

use crate::error::ProjectError;
use crate::manifest::{CargoManifest, DependencySpec, VersionField, read_manifest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    VirtualWorkspace,
    WorkspaceWithRoot,
    SinglePackage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoProject {
    pub root: PathBuf,
    pub kind: ProjectKind,
    /// Packages in discovery order. `dependencies` only names packages of
    /// this project.
    pub packages: Vec<PackageInfo>,
}

impl CargoProject {
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("Cargo.toml")
    }
}

/// Locates the enclosing workspace (or single package) of `start_dir` and
/// reads every member.
///
/// # Errors
///
/// Returns `ProjectError` if no project root can be found or if manifest parsing fails.
pub fn discover_project(start_dir: &Path) -> Result<CargoProject, ProjectError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::ManifestRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let (root, manifest) = find_project_root(&start_dir)?;
    let kind = determine_project_kind(&manifest);
    let packages = collect_packages(&root, &manifest, &kind)?;
    debug!(root = %root.display(), ?kind, packages = packages.len(), "discovered project");

    Ok(CargoProject {
        root,
        kind,
        packages,
    })
}

fn find_project_root(start_dir: &Path) -> Result<(PathBuf, CargoManifest), ProjectError> {
    let mut current = start_dir.to_path_buf();
    let mut fallback_single_package: Option<(PathBuf, CargoManifest)> = None;

    loop {
        let manifest_path = current.join("Cargo.toml");

        if manifest_path.exists() {
            let manifest = read_manifest(&manifest_path)?;

            if manifest.workspace.is_some() {
                return Ok((current, manifest));
            }

            if manifest.package.is_some() && fallback_single_package.is_none() {
                fallback_single_package = Some((current.clone(), manifest));
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return fallback_single_package.ok_or_else(|| ProjectError::NotFound {
                    start_dir: start_dir.to_path_buf(),
                });
            }
        }
    }
}

fn determine_project_kind(manifest: &CargoManifest) -> ProjectKind {
    match (&manifest.workspace, &manifest.package) {
        (Some(_), Some(_)) => ProjectKind::WorkspaceWithRoot,
        (None, Some(_)) => ProjectKind::SinglePackage,
        (Some(_) | None, None) => ProjectKind::VirtualWorkspace,
    }
}

/// Everything dependency resolution needs from the root manifest.
struct WorkspaceContext<'a> {
    version: Option<&'a String>,
    dependencies: &'a BTreeMap<String, DependencySpec>,
}

fn read_package(
    dir: &Path,
    manifest: &CargoManifest,
    context: &WorkspaceContext<'_>,
) -> Result<Option<PackageInfo>, ProjectError> {
    let Some(pkg) = &manifest.package else {
        return Ok(None);
    };
    let manifest_path = dir.join("Cargo.toml");
    let version = resolve_version(pkg.version.as_ref(), context.version, &manifest_path)?;

    let mut dependencies: Vec<String> = Vec::new();
    for (key, spec) in manifest.release_dependencies() {
        let name = spec.package_name(key, context.dependencies);
        if !dependencies.iter().any(|d| d == name) {
            dependencies.push(name.to_string());
        }
    }

    Ok(Some(PackageInfo {
        name: pkg.name.clone(),
        version,
        path: dir.to_path_buf(),
        dependencies,
    }))
}

fn collect_packages(
    root: &Path,
    manifest: &CargoManifest,
    kind: &ProjectKind,
) -> Result<Vec<PackageInfo>, ProjectError> {
    let empty = BTreeMap::new();
    let context = WorkspaceContext {
        version: manifest
            .workspace
            .as_ref()
            .and_then(|ws| ws.package.as_ref())
            .and_then(|pkg| pkg.version.as_ref()),
        dependencies: manifest
            .workspace
            .as_ref()
            .map_or(&empty, |ws| &ws.dependencies),
    };

    let mut packages = Vec::new();

    if matches!(
        kind,
        ProjectKind::WorkspaceWithRoot | ProjectKind::SinglePackage
    ) {
        packages.extend(read_package(root, manifest, &context)?);
    }

    if let Some(workspace) = &manifest.workspace {
        let members = workspace.members.as_deref().unwrap_or(&[]);
        let excludes = workspace.exclude.as_deref().unwrap_or(&[]);

        for pattern in members {
            for member_dir in expand_glob_pattern(root, pattern, excludes)? {
                let member_manifest_path = member_dir.join("Cargo.toml");
                if !member_manifest_path.exists() {
                    continue;
                }

                let member_manifest = read_manifest(&member_manifest_path)?;
                packages.extend(read_package(&member_dir, &member_manifest, &context)?);
            }
        }
    }

    retain_internal_dependencies(&mut packages);
    Ok(packages)
}

fn retain_internal_dependencies(packages: &mut [PackageInfo]) {
    let names: HashSet<String> = packages.iter().map(|p| p.name.clone()).collect();
    for package in packages {
        package
            .dependencies
            .retain(|dep| *dep != package.name && names.contains(dep));
    }
}

fn resolve_version(
    version_field: Option<&VersionField>,
    workspace_version: Option<&String>,
    manifest_path: &Path,
) -> Result<String, ProjectError> {
    let version_str = match version_field {
        Some(VersionField::Literal(v)) => v.clone(),
        Some(VersionField::Inherited(inherited)) if inherited.workspace => workspace_version
            .ok_or_else(|| ProjectError::MissingField {
                path: manifest_path.to_path_buf(),
                field: "workspace.package.version",
            })?
            .clone(),
        Some(VersionField::Inherited(_)) | None => {
            return Err(ProjectError::MissingField {
                path: manifest_path.to_path_buf(),
                field: "package.version",
            });
        }
    };

    match Version::parse(&version_str) {
        Ok(_) => Ok(version_str),
        Err(source) => Err(ProjectError::InvalidVersion {
            path: manifest_path.to_path_buf(),
            version: version_str,
            source,
        }),
    }
}

fn expand_glob_pattern(
    root: &Path,
    pattern: &str,
    excludes: &[String],
) -> Result<Vec<PathBuf>, ProjectError> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let exclude_matchers: Vec<_> = excludes
        .iter()
        .filter_map(|ex| {
            GlobBuilder::new(ex)
                .literal_separator(true)
                .build()
                .ok()
                .map(|g| g.compile_matcher())
        })
        .collect();

    let mut dirs = Vec::new();
    collect_matching_dirs(root, root, &glob, &exclude_matchers, &mut dirs)?;
    dirs.sort();

    Ok(dirs)
}

fn collect_matching_dirs(
    base: &Path,
    current: &Path,
    glob: &globset::GlobMatcher,
    excludes: &[globset::GlobMatcher],
    results: &mut Vec<PathBuf>,
) -> Result<(), ProjectError> {
    for entry in std::fs::read_dir(current)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let relative = path.strip_prefix(base).unwrap_or(&path);
        if relative.starts_with("target") || relative.starts_with(".git") {
            continue;
        }
        if excludes.iter().any(|ex| ex.is_match(relative)) {
            continue;
        }

        if glob.is_match(relative) {
            results.push(path.clone());
        }

        collect_matching_dirs(base, &path, glob, excludes, results)?;
    }

    Ok(())
}
