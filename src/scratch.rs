//! Scratch directory housekeeping

use std::path::Path;
use glob::{glob_with, MatchOptions, Pattern};
use log::debug;
use crate::error::CleanupError;

/// Delete every file directly inside `dir`
///
/// Subdirectories are left alone. A missing or already empty directory is
/// not an error, so calling this twice in a row is fine. Returns the number of
/// files removed.
pub fn empty_dir(dir: &Path) -> Result<usize, CleanupError> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| CleanupError::InvalidPath(dir.to_path_buf()))?;

    let pattern = format!("{}/*", Pattern::escape(dir_str.trim_end_matches('/')));

    // Dotfiles left behind by viewers count as scratch too
    let options = MatchOptions {
        require_literal_leading_dot: false,
        ..MatchOptions::new()
    };

    let entries = glob_with(&pattern, options)
        .map_err(|e| CleanupError::Pattern(e.to_string()))?;

    let mut removed = 0;
    for entry in entries {
        let path = entry.map_err(|e| CleanupError::ReadEntry {
            dir: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        if path.is_dir() {
            debug!("Leaving subdirectory in place: '{}'", path.display());
            continue;
        }

        std::fs::remove_file(&path).map_err(|source| CleanupError::RemoveFile {
            path: path.clone(),
            source,
        })?;
        removed += 1;
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_dir_removes_files_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path();
        std::fs::write(dir.join("page_0001.pdf"), b"x").unwrap();
        std::fs::write(dir.join("page_0002.pdf"), b"x").unwrap();
        std::fs::write(dir.join(".hidden"), b"x").unwrap();
        std::fs::create_dir(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested").join("keep.pdf"), b"x").unwrap();

        let removed = empty_dir(dir).unwrap();

        assert_eq!(removed, 3);
        assert!(!dir.join("page_0001.pdf").exists());
        assert!(!dir.join(".hidden").exists());
        assert!(dir.join("nested").join("keep.pdf").exists());
    }

    #[test]
    fn test_empty_dir_twice_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(temp_dir.path().join("page_0001.pdf"), b"x").unwrap();

        assert_eq!(empty_dir(temp_dir.path()).unwrap(), 1);
        assert_eq!(empty_dir(temp_dir.path()).unwrap(), 0);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_dir_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("does-not-exist");
        assert_eq!(empty_dir(&missing).unwrap(), 0);
    }

    #[test]
    fn test_empty_dir_with_glob_characters_in_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().join("scratch [1]");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("page_0001.pdf"), b"x").unwrap();

        assert_eq!(empty_dir(&dir).unwrap(), 1);
    }
}
