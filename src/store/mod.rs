//! Flat-file content store
//!
//! Posts live one per file under the posts directory; projects share a single
//! JSON array file. Every write goes through [`write_atomic`], so readers only
//! ever observe a complete old or complete new file.

mod posts;
mod projects;

use std::fs;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::content::FrontMatterError;

pub use posts::PostStore;
pub use projects::ProjectStore;

/// Errors surfaced by store operations. The display text is meant for humans.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
    #[error("projects file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Write `contents` to a temp file next to `path`, then rename it into place
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/file.txt");

        write_atomic(&path, b"one").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one");

        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");

        // only the target remains, no stray temp files
        let entries = fs::read_dir(tmp.path().join("a/b")).unwrap().count();
        assert_eq!(entries, 1);
    }
}
