use changeset_core::BumpType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version '{version}'")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("prerelease counter '{identifier}' of version '{version}' is not a number")]
    NonNumericPrerelease { version: String, identifier: String },

    #[error("internal error: cannot increment '{version}' with bump type {bump_type}")]
    NoneBump {
        version: String,
        bump_type: BumpType,
    },

    #[error("cannot apply {bump_type} bump to '{version}': {component} version would overflow")]
    ComponentOverflow {
        version: String,
        bump_type: BumpType,
        component: &'static str,
    },

    #[error("prerelease counter of version '{version}' cannot be incremented")]
    PreCounterOverflow { version: String },

    #[error("internal error: no prerelease counter for package '{package}'")]
    MissingPreCounter { package: String },
}
