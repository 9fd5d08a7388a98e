use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state directory unusable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the state directory exists; create it when missing.
pub fn ensure_state_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::StateDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::StateDir("path is not a directory".into()));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| StoreError::StateDir(e.to_string()))
}

/// Whole-or-nothing writes for panel state files: the content goes to a
/// temp file in the same directory, is flushed to disk, then renamed over
/// the destination. A crash mid-write leaves the old file intact.
pub struct AtomicStateFile {
    dir: PathBuf,
}

impl AtomicStateFile {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, StoreError> {
        ensure_state_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content.as_bytes())?;
        staged.flush()?;
        staged.as_file_mut().sync_all()?;
        staged
            .persist(&target)
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_directory_and_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("state");
        let writer = AtomicStateFile::new(dir.clone());

        let path = writer.write("panel.ron", "(collapsed: true)").unwrap();

        assert_eq!(path, dir.join("panel.ron"));
        assert_eq!(fs::read_to_string(path).unwrap(), "(collapsed: true)");
    }

    #[test]
    fn write_replaces_existing_content() {
        let root = tempfile::tempdir().unwrap();
        let writer = AtomicStateFile::new(root.path().to_path_buf());

        writer.write("panel.ron", "first").unwrap();
        let path = writer.write("panel.ron", "second").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn state_dir_must_be_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let file_path = root.path().join("occupied");
        fs::write(&file_path, "x").unwrap();

        let err = ensure_state_dir(&file_path).unwrap_err();
        assert!(matches!(err, StoreError::StateDir(_)));
    }
}
