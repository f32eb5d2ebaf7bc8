//! Backup of pre-existing configuration directories
//!
//! A destination that is about to be replaced is renamed next to itself with
//! a timestamped `.bak` suffix. Nothing is ever deleted.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::types::{DotsmithError, DotsmithResult};

/// Rename `path` to `<name>.bak.<UTC timestamp>` in its parent directory and
/// return the backup location.
pub async fn backup_dir(path: &Path) -> DotsmithResult<PathBuf> {
    let stamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
    backup_dir_with_label(path, &stamp).await
}

/// Rename `path` using an explicit label instead of the current time.
pub async fn backup_dir_with_label(path: &Path, label: &str) -> DotsmithResult<PathBuf> {
    if !path.exists() {
        return Err(DotsmithError::Backup(format!(
            "nothing to back up at {}",
            path.display()
        )));
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            DotsmithError::Path(format!("invalid backup source {}", path.display()))
        })?;
    let parent = path.parent().ok_or_else(|| {
        DotsmithError::Path(format!("backup source {} has no parent", path.display()))
    })?;

    // A previous run in the same second may already hold the name.
    let mut candidate = parent.join(format!("{name}.bak.{label}"));
    let mut attempt = 1;
    while candidate.exists() {
        candidate = parent.join(format!("{name}.bak.{label}.{attempt}"));
        attempt += 1;
    }

    tokio::fs::rename(path, &candidate).await.map_err(|e| {
        DotsmithError::Backup(format!(
            "failed to move {} to {}: {}",
            path.display(),
            candidate.display(),
            e
        ))
    })?;

    Ok(candidate)
}
