mod plan;

pub(crate) use plan::{JsonPlanFormatter, PlainTextPlanFormatter, PlanFormatter};

pub(crate) const PRERELEASE_BANNER: &str = "\
===============================IMPORTANT!===============================
You are in prerelease mode.
If you meant to do a normal release, run `cargo changeset pre exit`
and plan again.
------------------------------------------------------------------------
";
