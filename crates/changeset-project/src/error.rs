use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("no Cargo.toml found traversing from '{start_dir}'")]
    NotFound { start_dir: PathBuf },

    #[error("failed to read manifest at '{path}'")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest at '{path}'")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("manifest at '{path}' missing required field '{field}'")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("invalid version '{version}' in package at '{path}'")]
    InvalidVersion {
        path: PathBuf,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid glob pattern '{pattern}'")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("package '{package}' appears in more than one linked group")]
    DuplicateLinkedPackage { package: String },

    #[error("linked group references unknown package '{package}'")]
    UnknownLinkedPackage { package: String },

    #[error("failed to read changeset directory '{path}'")]
    ChangesetDirRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read changeset '{path}'")]
    ChangesetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse changeset '{path}'")]
    ChangesetParse {
        path: PathBuf,
        #[source]
        source: changeset_parse::FormatError,
    },

    #[error("failed to read prerelease state at '{path}'")]
    PreStateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse prerelease state at '{path}'")]
    PreStateParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize prerelease state for '{path}'")]
    PreStateSerialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("failed to write prerelease state to '{path}'")]
    PreStateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("already in prerelease mode with tag '{tag}'")]
    AlreadyInPreMode { tag: String },

    #[error("not in prerelease mode")]
    NotInPreMode,
}
