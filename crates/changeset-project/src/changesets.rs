use std::fs;
use std::path::{Path, PathBuf};

use changeset_core::Changeset;
use changeset_parse::parse_changeset;
use tracing::debug;

use crate::error::ProjectError;

const README: &str = "README.md";

fn changeset_files(changeset_dir: &Path) -> Result<Vec<PathBuf>, ProjectError> {
    let entries = match fs::read_dir(changeset_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ProjectError::ChangesetDirRead {
                path: changeset_dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ProjectError::ChangesetDirRead {
                path: changeset_dir.to_path_buf(),
                source,
            })?
            .path();

        let is_markdown = path.extension().is_some_and(|ext| ext == "md");
        let is_readme = path.file_name().is_some_and(|name| name == README);
        if path.is_file() && is_markdown && !is_readme {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Reads every changeset in `changeset_dir`, sorted by file name. The id of
/// each changeset is its file stem. A missing directory holds no changesets.
///
/// # Errors
///
/// Returns `ProjectError` if the directory or a changeset file cannot be read
/// or parsed.
pub fn read_changesets(changeset_dir: &Path) -> Result<Vec<Changeset>, ProjectError> {
    let mut changesets = Vec::new();

    for path in changeset_files(changeset_dir)? {
        let id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = fs::read_to_string(&path).map_err(|source| ProjectError::ChangesetRead {
            path: path.clone(),
            source,
        })?;
        let changeset =
            parse_changeset(&id, &content).map_err(|source| ProjectError::ChangesetParse {
                path: path.clone(),
                source,
            })?;
        changesets.push(changeset);
    }

    debug!(
        dir = %changeset_dir.display(),
        count = changesets.len(),
        "read changesets"
    );
    Ok(changesets)
}

#[cfg(test)]
mod tests {
    use changeset_core::BumpType;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("write file");
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let dir = TempDir::new().expect("temp dir");

        let changesets = read_changesets(&dir.path().join(".changeset")).expect("read");

        assert!(changesets.is_empty());
    }

    #[test]
    fn reads_markdown_files_sorted_by_name() {
        let dir = TempDir::new().expect("temp dir");
        write(dir.path(), "zesty-otters.md", "---\n\"pkg-a\": patch\n---\nLater.\n");
        write(dir.path(), "brave-lions.md", "---\n\"pkg-b\": minor\n---\nEarlier.\n");
        write(dir.path(), "README.md", "# Changesets\n");
        write(dir.path(), "pre.toml", "mode = \"pre\"\n");

        let changesets = read_changesets(dir.path()).expect("read");

        let ids: Vec<_> = changesets.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["brave-lions", "zesty-otters"]);
        assert_eq!(changesets[0].releases[0].bump_type, BumpType::Minor);
        assert_eq!(changesets[1].summary, "Later.");
    }

    #[test]
    fn parse_failure_names_the_file() {
        let dir = TempDir::new().expect("temp dir");
        write(dir.path(), "broken.md", "no front matter here\n");

        let err = read_changesets(dir.path()).expect_err("should fail");

        assert!(
            matches!(err, ProjectError::ChangesetParse { ref path, .. } if path.ends_with("broken.md"))
        );
    }
}
