use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ProjectError;

#[derive(Debug, Deserialize)]
pub(crate) struct CargoManifest {
    pub(crate) package: Option<Package>,
    pub(crate) workspace: Option<WorkspaceSection>,
    #[serde(default)]
    pub(crate) dependencies: BTreeMap<String, DependencySpec>,
    #[serde(default, rename = "build-dependencies")]
    pub(crate) build_dependencies: BTreeMap<String, DependencySpec>,
}

impl CargoManifest {
    /// Dependency tables that force a dependent release. Dev-dependencies are
    /// left out.
    pub(crate) fn release_dependencies(&self) -> impl Iterator<Item = (&str, &DependencySpec)> {
        self.dependencies
            .iter()
            .chain(&self.build_dependencies)
            .map(|(key, spec)| (key.as_str(), spec))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Package {
    pub(crate) name: String,
    pub(crate) version: Option<VersionField>,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum VersionField {
    Literal(String),
    Inherited(InheritedVersion),
}

#[derive(Debug, Deserialize)]
pub(crate) struct InheritedVersion {
    pub(crate) workspace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DependencySpec {
    #[allow(dead_code)]
    Version(String),
    Detailed(DetailedDependency),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DetailedDependency {
    pub(crate) package: Option<String>,
    #[serde(default)]
    pub(crate) workspace: bool,
}

impl DependencySpec {
    fn renamed_to(&self) -> Option<&str> {
        match self {
            Self::Version(_) => None,
            Self::Detailed(detail) => detail.package.as_deref(),
        }
    }

    fn inherits(&self) -> bool {
        matches!(self, Self::Detailed(detail) if detail.workspace)
    }

    /// Real package name behind a dependency key, honoring `package = "..."`
    /// renames. `inherited` resolves `workspace = true` entries.
    pub(crate) fn package_name<'a>(
        &'a self,
        key: &'a str,
        inherited: &'a BTreeMap<String, DependencySpec>,
    ) -> &'a str {
        if let Some(package) = self.renamed_to() {
            return package;
        }
        if self.inherits() {
            if let Some(package) = inherited.get(key).and_then(DependencySpec::renamed_to) {
                return package;
            }
        }
        key
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspaceSection {
    pub(crate) members: Option<Vec<String>>,
    pub(crate) exclude: Option<Vec<String>>,
    pub(crate) package: Option<WorkspacePackage>,
    #[serde(default)]
    pub(crate) dependencies: BTreeMap<String, DependencySpec>,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspacePackage {
    pub(crate) version: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Metadata {
    pub(crate) changeset: Option<ChangesetMetadata>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct ChangesetMetadata {
    #[serde(default)]
    pub(crate) linked: Vec<Vec<String>>,
    pub(crate) commit: Option<bool>,
    pub(crate) changeset_dir: Option<String>,
}

pub(crate) fn read_manifest(path: &Path) -> Result<CargoManifest, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ProjectError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> CargoManifest {
        toml::from_str(content).expect("valid manifest")
    }

    fn dependency_names(manifest: &CargoManifest) -> Vec<&str> {
        static EMPTY: BTreeMap<String, DependencySpec> = BTreeMap::new();
        let inherited = manifest
            .workspace
            .as_ref()
            .map_or(&EMPTY, |ws| &ws.dependencies);
        manifest
            .release_dependencies()
            .map(|(key, spec)| spec.package_name(key, inherited))
            .collect()
    }

    #[test]
    fn collects_normal_and_build_dependencies() {
        let manifest = parse(
            r#"
[package]
name = "app"
version = "0.1.0"

[dependencies]
core = { path = "../core" }
serde = "1"

[build-dependencies]
codegen = { path = "../codegen" }

[dev-dependencies]
fixtures = { path = "../fixtures" }
"#,
        );

        let names = dependency_names(&manifest);

        assert_eq!(names, vec!["core", "serde", "codegen"]);
    }

    #[test]
    fn honors_package_renames() {
        let manifest = parse(
            r#"
[package]
name = "app"
version = "0.1.0"

[dependencies]
engine = { path = "../core", package = "engine-core" }
"#,
        );

        assert_eq!(dependency_names(&manifest), vec!["engine-core"]);
    }

    #[test]
    fn resolves_renames_through_workspace_dependencies() {
        let manifest = parse(
            r#"
[workspace]
members = ["crates/*"]

[workspace.dependencies]
engine = { path = "crates/core", package = "engine-core" }

[package]
name = "app"
version = "0.1.0"

[dependencies]
engine = { workspace = true }
"#,
        );

        assert_eq!(dependency_names(&manifest), vec!["engine-core"]);
    }

    #[test]
    fn reads_changeset_metadata() {
        let manifest = parse(
            r#"
[workspace]
members = ["crates/*"]

[workspace.metadata.changeset]
linked = [["a", "b"], ["c", "d"]]
commit = true
changeset-dir = "changes"
"#,
        );

        let metadata = manifest
            .workspace
            .and_then(|ws| ws.metadata)
            .and_then(|m| m.changeset)
            .expect("changeset metadata");
        assert_eq!(metadata.linked.len(), 2);
        assert_eq!(metadata.commit, Some(true));
        assert_eq!(metadata.changeset_dir.as_deref(), Some("changes"));
    }
}
