use indexmap::{IndexMap, IndexSet};

use crate::types::PackageInfo;

/// Reverse dependency edges: package name to the packages that directly
/// depend on it.
///
/// Only one hop is recorded. Transitive dependents are reached by repeated
/// propagation, not by the graph itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependentsGraph {
    dependents: IndexMap<String, IndexSet<String>>,
}

impl DependentsGraph {
    /// Builds the graph from the dependency lists of `packages`.
    ///
    /// Dependencies on names outside `packages` are ignored.
    #[must_use]
    pub fn from_packages(packages: &[PackageInfo]) -> Self {
        let mut dependents: IndexMap<String, IndexSet<String>> = packages
            .iter()
            .map(|pkg| (pkg.name.clone(), IndexSet::new()))
            .collect();

        for package in packages {
            for dependency in &package.dependencies {
                if dependency == &package.name {
                    continue;
                }
                if let Some(set) = dependents.get_mut(dependency) {
                    set.insert(package.name.clone());
                }
            }
        }

        Self { dependents }
    }

    pub fn dependents_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.dependents
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}
