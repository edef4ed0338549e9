//! Temporary data directories for loader tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Create an empty temporary data directory.
pub fn data_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temporary data directory")
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write test CSV");
    path
}
