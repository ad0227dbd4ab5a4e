use crate::{AppError, AppResult, ResultExt};
use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads a persisted JSON blob. Absent, unreadable, or corrupt files all
/// come back as `None`; the caller treats that as "no state yet".
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            if error.kind() != ErrorKind::NotFound {
                tracing::debug!(event = "store_read_failed", path = %path.display(), error = %error);
            }
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::debug!(event = "store_parse_failed", path = %path.display(), error = %error);
            None
        }
    }
}

/// Writes the whole blob to a temp sibling, then renames it over the
/// target, so a reader never observes a half-written file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating store directory {}", parent.display()))
            .with_code("store_dir_create_failed", "failed to create store directory")
            .with_ctx("path", path.display().to_string())?;
    }

    let serialized = serde_json::to_string(value)
        .with_code("store_serialize_failed", "failed to serialize store payload")
        .with_ctx("path", path.display().to_string())?;

    let temp_path = temp_sibling(path);
    fs::write(&temp_path, serialized)
        .with_context(|| format!("writing temp store file {}", temp_path.display()))
        .with_code("store_write_failed", "failed to write store file")
        .with_ctx("path", path.display().to_string())?;

    if let Err(error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(AppError::new("store_replace_failed", "failed to replace store file")
            .with_context("path", path.display().to_string())
            .with_source(error));
    }

    Ok(())
}

/// Persistence variant for the state whose loss is tolerated: failures are
/// logged at debug level and swallowed, leaving memory authoritative.
pub fn write_json_best_effort<T: Serialize>(path: &Path, value: &T) {
    if let Err(error) = write_json_atomic(path, value) {
        tracing::debug!(event = "store_write_skipped", path = %path.display(), error = %error);
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "store".to_string());
    path.with_file_name(format!(".{file_name}.tmp"))
}

#[cfg(test)]
#[path = "../tests/store/store_tests.rs"]
mod tests;
