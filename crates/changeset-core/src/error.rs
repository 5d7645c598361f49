use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangesetError {
    #[error("unknown bump type '{0}' (expected none, patch, minor or major)")]
    UnknownBumpType(String),
}

pub type Result<T> = std::result::Result<T, ChangesetError>;
