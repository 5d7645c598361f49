use std::path::PathBuf;

use changeset_core::{BumpType, Changeset, PackageInfo, PackageRelease};

use crate::types::PackageMap;

pub fn make_package(name: &str, version: &str, dependencies: &[&str]) -> PackageInfo {
    PackageInfo {
        name: name.to_string(),
        version: version.to_string(),
        path: PathBuf::from(format!("/mock/crates/{name}")),
        dependencies: dependencies.iter().map(ToString::to_string).collect(),
    }
}

pub fn make_package_map(packages: &[PackageInfo]) -> PackageMap {
    packages
        .iter()
        .map(|pkg| (pkg.name.clone(), pkg.clone()))
        .collect()
}

pub fn make_changeset(id: &str, releases: &[(&str, BumpType)]) -> Changeset {
    Changeset {
        id: id.to_string(),
        summary: format!("Summary of {id}"),
        releases: releases
            .iter()
            .map(|(name, bump_type)| PackageRelease {
                name: (*name).to_string(),
                bump_type: *bump_type,
            })
            .collect(),
    }
}

pub fn linked(groups: &[&[&str]]) -> Vec<Vec<String>> {
    groups
        .iter()
        .map(|group| group.iter().map(ToString::to_string).collect())
        .collect()
}
