use indexmap::IndexMap;
use serde::Deserialize;
use serde_with::{MapPreventDuplicates, serde_as};

use changeset_core::{BumpType, Changeset, PackageRelease};

use crate::error::{FormatError, FrontMatterError, ValidationError};

const DELIMITER: &str = "---";

const MAX_INPUT_SIZE: usize = 16 * 1024 * 1024;

#[serde_as]
#[derive(Deserialize)]
struct Requests {
    #[serde(flatten)]
    #[serde_as(as = "MapPreventDuplicates<_, _>")]
    bumps: IndexMap<String, BumpType>,
}

/// Front matter and body of a changeset file.
struct Sections<'a> {
    yaml: &'a str,
    body: &'a str,
}

fn skip_newline(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

/// Byte offset of the closing delimiter line inside `rest`.
fn closing_delimiter(rest: &str) -> Option<usize> {
    if rest.starts_with(DELIMITER) {
        return Some(0);
    }
    rest.find("\n---").map(|pos| pos + 1)
}

fn split_sections(content: &str) -> Result<Sections<'_>, FrontMatterError> {
    let rest = content
        .trim_start()
        .strip_prefix(DELIMITER)
        .ok_or(FrontMatterError::MissingOpeningDelimiter)?;
    let rest = skip_newline(rest);

    let end = closing_delimiter(rest).ok_or(FrontMatterError::MissingClosingDelimiter)?;
    let yaml = rest[..end].trim_end_matches(['\r', '\n']);
    if yaml.trim().is_empty() {
        return Err(FrontMatterError::EmptyFrontMatter);
    }

    let body = skip_newline(&rest[end + DELIMITER.len()..]);
    Ok(Sections { yaml, body })
}

/// Parses a changeset file. `id` identifies the changeset, usually the file
/// stem.
///
/// The front matter maps package names to bump types:
///
/// ```text
/// ---
/// "crate-a": minor
/// "crate-b": patch
/// ---
/// Summary of the change.
/// ```
///
/// # Errors
///
/// Returns `FormatError` if the front matter is missing or malformed, lists a
/// package twice, or lists no package at all.
pub fn parse_changeset(id: &str, content: &str) -> Result<Changeset, FormatError> {
    if content.len() > MAX_INPUT_SIZE {
        return Err(ValidationError::InputTooLarge {
            max_bytes: MAX_INPUT_SIZE,
        }
        .into());
    }

    let Sections { yaml, body } = split_sections(content)?;
    let requests: Requests = serde_yml::from_str(yaml)?;

    if requests.bumps.is_empty() {
        return Err(ValidationError::NoReleases.into());
    }

    Ok(Changeset {
        id: id.to_string(),
        summary: body.trim().to_string(),
        releases: requests
            .bumps
            .into_iter()
            .map(|(name, bump_type)| PackageRelease { name, bump_type })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_package_with_summary() {
        let content = r#"---
"pkg-a": minor
---
Add streaming support to the client.
"#;

        let changeset = parse_changeset("brave-lions-dance", content).expect("should parse");

        assert_eq!(changeset.id, "brave-lions-dance");
        assert_eq!(changeset.releases.len(), 1);
        assert_eq!(changeset.releases[0].name, "pkg-a");
        assert_eq!(changeset.releases[0].bump_type, BumpType::Minor);
        assert_eq!(changeset.summary, "Add streaming support to the client.");
    }

    #[test]
    fn keeps_declaration_order() {
        let content = r#"---
"pkg-c": major
"pkg-a": patch
"pkg-b": none
---
Reshuffle.
"#;

        let changeset = parse_changeset("cs", content).expect("should parse");

        let requests: Vec<_> = changeset
            .releases
            .iter()
            .map(|r| (r.name.as_str(), r.bump_type))
            .collect();
        assert_eq!(
            requests,
            vec![
                ("pkg-c", BumpType::Major),
                ("pkg-a", BumpType::Patch),
                ("pkg-b", BumpType::None),
            ]
        );
    }

    #[test]
    fn summary_may_contain_delimiter_text() {
        let content = "---\n\"pkg-a\": patch\n---\nUse --- as a separator in tables.\n";

        let changeset = parse_changeset("cs", content).expect("should parse");

        assert_eq!(changeset.summary, "Use --- as a separator in tables.");
    }

    #[test]
    fn empty_summary() {
        let content = "---\n\"pkg-a\": patch\n---\n";

        let changeset = parse_changeset("cs", content).expect("should parse");

        assert!(changeset.summary.is_empty());
    }

    #[test]
    fn windows_line_endings() {
        let content = "---\r\n\"pkg-a\": patch\r\n\"pkg-b\": minor\r\n---\r\nCRLF summary.\r\n";

        let changeset = parse_changeset("cs", content).expect("should parse");

        assert_eq!(changeset.releases.len(), 2);
        assert_eq!(changeset.releases[1].name, "pkg-b");
        assert_eq!(changeset.summary, "CRLF summary.");
    }

    #[test]
    fn error_missing_opening_delimiter() {
        let content = "\"pkg-a\": patch\n---\nSummary.\n";

        let err = parse_changeset("cs", content).expect_err("should fail");

        assert!(err.to_string().contains("opening delimiter"));
    }

    #[test]
    fn error_missing_closing_delimiter() {
        let content = "---\n\"pkg-a\": patch\nSummary without a closing line.\n";

        let err = parse_changeset("cs", content).expect_err("should fail");

        assert!(err.to_string().contains("closing delimiter"));
    }

    #[test]
    fn error_empty_front_matter() {
        let content = "---\n---\nSummary.\n";

        let err = parse_changeset("cs", content).expect_err("should fail");

        assert!(matches!(
            err,
            FormatError::FrontMatter(FrontMatterError::EmptyFrontMatter)
        ));
    }

    #[test]
    fn error_unknown_bump_type() {
        let content = "---\n\"pkg-a\": huge\n---\nSummary.\n";

        let err = parse_changeset("cs", content).expect_err("should fail");

        assert!(matches!(err, FormatError::Yaml(_)));
    }

    #[test]
    fn error_no_releases() {
        let content = "---\n{}\n---\nSummary.\n";

        let err = parse_changeset("cs", content).expect_err("should fail");

        assert!(err.to_string().contains("at least one release"));
    }

    #[test]
    fn error_duplicate_package() {
        let content = "---\n\"pkg-a\": major\n\"pkg-a\": patch\n---\nSummary.\n";

        let err = parse_changeset("cs", content).expect_err("should fail");

        assert!(
            err.to_string().contains("duplicate"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn error_input_too_large() {
        let content = "a".repeat(MAX_INPUT_SIZE + 1);

        let err = parse_changeset("cs", &content).expect_err("should fail");

        assert!(err.to_string().contains("maximum size"));
    }
}
