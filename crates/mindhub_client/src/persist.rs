use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("export target has no file name: {0:?}")]
    NoFileName(PathBuf),
    #[error("could not serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes loaded list items to `path` as a pretty JSON array.
///
/// The file is written to a temp file next to the target and renamed into
/// place, so a reader never sees a half-written export.
pub fn export_json<T: Serialize>(path: &Path, items: &[T]) -> Result<PathBuf, PersistError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PersistError::NoFileName(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_output_dir(&dir)?;

    let mut content = serde_json::to_vec_pretty(items)?;
    content.push(b'\n');

    let target = dir.join(file_name);
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(&content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
