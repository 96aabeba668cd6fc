//! Whole-file rewrite shared by the file backends

use plog_core::{StorageError, WriteMode};
use std::path::{Path, PathBuf};

/// Sibling path used by [`WriteMode::Atomic`]
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the file at `path` with `content`.
///
/// `Rewrite` truncates and writes in place; a crash mid-write leaves a partial file.
/// `Atomic` writes a temp file and renames it over the store.
pub(crate) fn replace_contents(path: &Path, content: &[u8], mode: WriteMode) -> Result<(), StorageError> {
    match mode {
        WriteMode::Rewrite => std::fs::write(path, content)?,
        WriteMode::Atomic => {
            let temp = temp_path(path);
            std::fs::write(&temp, content)?;
            std::fs::rename(&temp, path)?;
        }
    }
    Ok(())
}

/// Create parent directories for a store about to be created
pub(crate) fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
