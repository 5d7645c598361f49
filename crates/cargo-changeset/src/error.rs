use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("project error")]
    Project(#[from] changeset_project::ProjectError),

    #[error("failed to assemble release plan")]
    Assemble(#[from] changeset_assemble::AssembleError),

    #[error("failed to render release plan as JSON")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
