use thiserror::Error;

/// Failures that abort plan assembly. All of them indicate inconsistent
/// input or a bug; no partial plan is produced.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("version calculation failed")]
    Version(#[from] changeset_version::VersionError),

    #[error(
        "internal error: release for '{package}' has no counterpart in the full changeset history"
    )]
    MissingUnfilteredRelease { package: String },
}

pub type Result<T> = std::result::Result<T, AssembleError>;
