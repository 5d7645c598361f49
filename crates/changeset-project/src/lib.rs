mod changesets;
mod config;
mod error;
mod manifest;
mod pre_state;
mod project;

pub const DEFAULT_CHANGESET_DIR: &str = ".changeset";

pub use changesets::read_changesets;
pub use config::{ProjectConfig, load_config, validate_linked_groups};
pub use error::ProjectError;
pub use pre_state::{PRE_STATE_FILENAME, enter_pre, exit_pre, read_pre_state, write_pre_state};
pub use project::{CargoProject, ProjectKind, discover_project};

pub type Result<T> = std::result::Result<T, ProjectError>;
