//! Release plan assembly.
//!
//! Turns pending changesets into one release per affected package: bump
//! requests are flattened, dependents and linked groups are brought up to
//! date until nothing changes, and new versions are derived for normal,
//! prerelease and snapshot releases. Nothing here performs I/O.

mod assemble;
mod dependents;
mod error;
mod flatten;
mod links;
mod pre;
mod types;

#[cfg(test)]
mod fixtures;

pub use assemble::{assemble_release_plan, run_to_fixpoint};
pub use dependents::determine_dependents;
pub use error::{AssembleError, Result};
pub use flatten::flatten_releases;
pub use links::apply_links;
pub use pre::{TrackedPre, track_prerelease};
pub use types::{PackageMap, PlannedRelease, PreInfo, Release, ReleaseMap, ReleasePlan};
