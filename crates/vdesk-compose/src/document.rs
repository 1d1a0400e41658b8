//! Loading and saving compose documents.
//!
//! A vdesk compose file is ordinary compose YAML, optionally preceded by a
//! single `# comment: <text>` line carrying the container's note.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use vdesk_common::constants::COMMENT_PREFIX;
use vdesk_common::error::{Result, VdeskError};

/// A parsed compose document bound to its path on disk.
#[derive(Debug, Clone)]
pub struct ComposeFile {
    path: PathBuf,
    root: Mapping,
    comment: Option<String>,
}

impl ComposeFile {
    /// Reads and parses the compose document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VdeskError::Io`] if the file cannot be read and
    /// [`VdeskError::Compose`] if it is not a YAML mapping.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading compose file");
        let content = std::fs::read_to_string(path).map_err(|e| VdeskError::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Parses compose YAML that belongs at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VdeskError::Compose`] if `content` is not a YAML mapping.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| VdeskError::Compose {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let Value::Mapping(root) = value else {
            return Err(VdeskError::Compose {
                path: path.to_path_buf(),
                message: "document is not a mapping".into(),
            });
        };
        Ok(Self {
            path: path.to_path_buf(),
            root,
            comment: content.lines().next().and_then(parse_comment_line),
        })
    }

    /// Path this document was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Note stored on the first line, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Top-level YAML mapping.
    #[must_use]
    pub const fn root(&self) -> &Mapping {
        &self.root
    }

    /// Mutable top-level YAML mapping.
    pub const fn root_mut(&mut self) -> &mut Mapping {
        &mut self.root
    }

    /// Writes the document back to its path.
    ///
    /// With `Some(comment)` the first line becomes `# comment: <comment>`.
    /// With `None` an existing comment line in the file on disk is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be rendered or the file cannot be
    /// written.
    pub fn save(&mut self, comment: Option<&str>) -> Result<()> {
        let header = match comment {
            Some(text) => {
                let text = text.replace(['\r', '\n'], " ").trim().to_string();
                let header = format!("{COMMENT_PREFIX} {text}\n");
                self.comment = Some(text);
                Some(header)
            }
            None => existing_comment_line(&self.path),
        };
        let body = serde_yaml::to_string(&self.root).map_err(|e| VdeskError::Compose {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let mut out = header.unwrap_or_default();
        out.push_str(&body);
        std::fs::write(&self.path, out).map_err(|e| VdeskError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "saved compose file");
        Ok(())
    }
}

/// Extracts the note from a `# comment: ...` line.
#[must_use]
pub fn parse_comment_line(line: &str) -> Option<String> {
    line.trim()
        .strip_prefix(COMMENT_PREFIX)
        .map(|rest| rest.trim().to_string())
}

/// Returns the first line of `path` (with its newline) when it is a comment line.
fn existing_comment_line(path: &Path) -> Option<String> {
    let file = std::fs::File::open(path).ok()?;
    let mut first = String::new();
    let _ = BufReader::new(file).read_line(&mut first).ok()?;
    if !first.starts_with(COMMENT_PREFIX) {
        return None;
    }
    if !first.ends_with('\n') {
        first.push('\n');
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "services:\n  my_ws:\n    image: ubuntu:22.04\n";

    #[test]
    fn parse_reads_comment_line() {
        let doc = ComposeFile::parse(
            Path::new("x.yml"),
            "# comment: alice's desk\nservices: {}\n",
        )
        .unwrap();
        assert_eq!(doc.comment(), Some("alice's desk"));
    }

    #[test]
    fn parse_without_comment() {
        let doc = ComposeFile::parse(Path::new("x.yml"), TEMPLATE).unwrap();
        assert_eq!(doc.comment(), None);
        assert!(doc.root().contains_key("services"));
    }

    #[test]
    fn parse_rejects_non_mapping() {
        assert!(ComposeFile::parse(Path::new("x.yml"), "- a\n- b\n").is_err());
        assert!(ComposeFile::parse(Path::new("x.yml"), "").is_err());
        assert!(ComposeFile::parse(Path::new("x.yml"), "services: [unclosed").is_err());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ComposeFile::load(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, VdeskError::Io { .. }));
    }

    #[test]
    fn save_writes_new_comment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docker-compose.yml");
        std::fs::write(&path, TEMPLATE).unwrap();

        let mut doc = ComposeFile::load(&path).unwrap();
        doc.save(Some("gpu box")).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# comment: gpu box\n"));
        let reloaded = ComposeFile::load(&path).unwrap();
        assert_eq!(reloaded.comment(), Some("gpu box"));
        assert!(reloaded.root().contains_key("services"));
    }

    #[test]
    fn save_without_comment_preserves_existing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docker-compose.yml");
        std::fs::write(&path, format!("# comment: keep me\n{TEMPLATE}")).unwrap();

        let mut doc = ComposeFile::load(&path).unwrap();
        doc.save(None).unwrap();

        let reloaded = ComposeFile::load(&path).unwrap();
        assert_eq!(reloaded.comment(), Some("keep me"));
    }

    #[test]
    fn save_without_comment_and_none_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docker-compose.yml");
        std::fs::write(&path, TEMPLATE).unwrap();

        let mut doc = ComposeFile::load(&path).unwrap();
        doc.save(None).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("services:"));
    }

    #[test]
    fn comment_newlines_are_flattened() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docker-compose.yml");
        std::fs::write(&path, TEMPLATE).unwrap();

        let mut doc = ComposeFile::load(&path).unwrap();
        doc.save(Some("line one\nline two")).unwrap();

        let reloaded = ComposeFile::load(&path).unwrap();
        assert_eq!(reloaded.comment(), Some("line one line two"));
    }

    #[test]
    fn key_order_is_preserved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docker-compose.yml");
        std::fs::write(&path, "version: '3'\nservices: {}\nnetworks: {}\n").unwrap();

        let mut doc = ComposeFile::load(&path).unwrap();
        doc.save(None).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let version = written.find("version").unwrap();
        let services = written.find("services").unwrap();
        let networks = written.find("networks").unwrap();
        assert!(version < services && services < networks);
    }
}
