mod plan;
mod pre;

use std::path::Path;

use clap::{Args, Subcommand};

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the release plan computed from pending changesets
    Plan(PlanArgs),
    /// Manage prerelease mode
    Pre {
        #[command(subcommand)]
        action: PreCommand,
    },
}

#[derive(Args)]
pub(crate) struct PlanArgs {
    /// Compute snapshot versions `0.0.0-<tag>-<commit-hash>` instead
    #[arg(long, value_name = "TAG", requires = "commit_hash")]
    pub snapshot: Option<String>,

    /// Commit hash embedded in snapshot versions
    #[arg(long, value_name = "HASH", requires = "snapshot")]
    pub commit_hash: Option<String>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub(crate) enum PreCommand {
    /// Enter prerelease mode with the given tag (e.g. `beta`)
    Enter {
        /// Prerelease tag used in `<version>-<tag>.<n>`
        tag: String,
    },
    /// Leave prerelease mode on the next plan
    Exit,
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Plan(args) => plan::run(&args, start_path),
            Self::Pre { action } => match action {
                PreCommand::Enter { tag } => pre::enter(&tag, start_path),
                PreCommand::Exit => pre::exit(start_path),
            },
        }
    }
}
