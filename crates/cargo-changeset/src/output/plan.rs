use std::fmt::Write as _;

use changeset_assemble::ReleasePlan;

use crate::error::Result;

pub(crate) trait PlanFormatter {
    fn format(&self, plan: &ReleasePlan) -> Result<String>;
}

pub(crate) struct PlainTextPlanFormatter;

impl PlainTextPlanFormatter {
    fn format_changesets(output: &mut String, plan: &ReleasePlan) {
        if plan.changesets.is_empty() {
            return;
        }
        let _ = writeln!(output, "Changesets: {}", plan.changesets.len());
        for changeset in &plan.changesets {
            let headline = changeset.summary.lines().next().unwrap_or_default();
            let _ = writeln!(output, "  {}: {headline}", changeset.id);
        }
        output.push('\n');
    }

    fn format_releases(output: &mut String, plan: &ReleasePlan) {
        if plan.is_empty() {
            output.push_str("No packages to release.\n");
            return;
        }

        output.push_str("Planned releases:\n");
        for release in &plan.releases {
            let _ = writeln!(
                output,
                "  {} {} -> {} ({})",
                release.name, release.old_version, release.new_version, release.bump_type
            );
        }
    }

    fn format_pre_state(output: &mut String, plan: &ReleasePlan) {
        if let Some(state) = &plan.pre_state {
            let _ = writeln!(
                output,
                "\nPrerelease '{}' ({}): {} changesets consumed",
                state.tag,
                state.mode,
                state.changesets.len()
            );
        }
    }
}

impl PlanFormatter for PlainTextPlanFormatter {
    fn format(&self, plan: &ReleasePlan) -> Result<String> {
        let mut output = String::new();
        Self::format_changesets(&mut output, plan);
        Self::format_releases(&mut output, plan);
        Self::format_pre_state(&mut output, plan);
        Ok(output)
    }
}

pub(crate) struct JsonPlanFormatter;

impl PlanFormatter for JsonPlanFormatter {
    fn format(&self, plan: &ReleasePlan) -> Result<String> {
        let mut output = serde_json::to_string_pretty(plan)?;
        output.push('\n');
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use changeset_assemble::PlannedRelease;
    use changeset_core::{BumpType, Changeset, PackageRelease, PreState};

    use super::*;

    fn plan() -> ReleasePlan {
        ReleasePlan {
            changesets: vec![Changeset {
                id: "brave-lions".to_string(),
                summary: "Add streaming support.\n\nLonger description.".to_string(),
                releases: vec![PackageRelease {
                    name: "pkg-a".to_string(),
                    bump_type: BumpType::Minor,
                }],
            }],
            releases: vec![PlannedRelease {
                name: "pkg-a".to_string(),
                bump_type: BumpType::Minor,
                changesets: vec!["brave-lions".to_string()],
                old_version: "1.2.0".to_string(),
                new_version: "1.3.0".to_string(),
            }],
            pre_state: None,
        }
    }

    #[test]
    fn plain_text_lists_changesets_and_releases() {
        let output = PlainTextPlanFormatter.format(&plan()).expect("format");

        assert!(output.contains("Changesets: 1"));
        assert!(output.contains("  brave-lions: Add streaming support."));
        assert!(!output.contains("Longer description"));
        assert!(output.contains("  pkg-a 1.2.0 -> 1.3.0 (minor)"));
        assert!(!output.contains("Prerelease"));
    }

    #[test]
    fn plain_text_reports_prerelease_state() {
        let mut plan = plan();
        let mut state = PreState::new("beta");
        state.changesets.push("brave-lions".to_string());
        plan.pre_state = Some(state);

        let output = PlainTextPlanFormatter.format(&plan).expect("format");

        assert!(output.contains("Prerelease 'beta' (pre): 1 changesets consumed"));
    }

    #[test]
    fn plain_text_empty_plan() {
        let plan = ReleasePlan {
            changesets: Vec::new(),
            releases: Vec::new(),
            pre_state: None,
        };

        let output = PlainTextPlanFormatter.format(&plan).expect("format");

        assert_eq!(output, "No packages to release.\n");
    }

    #[test]
    fn json_is_parseable() {
        let output = JsonPlanFormatter.format(&plan()).expect("format");

        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["releases"][0]["new_version"], "1.3.0");
        assert_eq!(value["changesets"][0]["id"], "brave-lions");
    }
}
