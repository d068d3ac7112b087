//! Atomic file write operations using temp-and-rename strategy.
//!
//! This module provides safe, atomic file writing that prevents corruption
//! from interrupted writes.

use crate::utils::fs::dirs::ensure_dir;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// 1. Content goes to a temporary file in the target's directory
/// 2. The temporary file takes over the target's permissions
/// 3. The temporary file is synced to disk
/// 4. The temporary file is renamed over the target
///
/// Readers see either the old file or the complete new one. Parent
/// directories are created when missing.
///
/// A symlink is followed and the file it points to is replaced, so the link
/// itself survives. A new file gets the same mode as any other newly created
/// file (`0666` minus the umask on Unix).
///
/// # Examples
///
/// ```rust,no_run
/// use envtmpl_cli::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("/etc/app/app.conf"), b"listen 8080\n")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let target = resolve_target(path)?;
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut builder = Builder::new();
    builder.prefix(".envtmpl");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let mut temp = builder
        .tempfile_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write to temp file for {}", target.display()))?;

    if let Ok(existing) = fs::metadata(&target) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", target.display()))?;
    }
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename temp file to: {}", target.display()))?;

    tracing::trace!("Wrote {} bytes to {}", content.len(), target.display());
    Ok(())
}

/// The file a write to `path` should replace.
///
/// Symlinks resolve to their target, including dangling ones.
fn resolve_target(path: &Path) -> Result<PathBuf> {
    let is_link = fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink());
    if !is_link {
        return Ok(path.to_path_buf());
    }

    if let Ok(real) = fs::canonicalize(path) {
        return Ok(real);
    }

    let link = fs::read_link(path)
        .with_context(|| format!("Failed to read symlink {}", path.display()))?;
    tracing::debug!("{} is a dangling symlink to {}", path.display(), link.display());
    Ok(match path.parent() {
        Some(parent) => parent.join(link),
        None => link,
    })
}
