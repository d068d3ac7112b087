//! Directory operations for creating output directories and clearing stale files.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            format!(
                "Failed to create directory: {}\n\nCheck directory permissions and path validity",
                path.display()
            )
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Removes a regular file if present. Returns whether a file was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }

    fs::remove_file(path).with_context(|| format!("Failed to remove file: {}", path.display()))?;
    Ok(true)
}
