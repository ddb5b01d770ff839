//! Path utilities for module roots and the output root.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use typeweave_types::names;

/// Full filesystem path of the file holding `type_name` under `root`.
pub fn type_file_in(root: &Path, type_name: &str) -> PathBuf {
    root.join(names::type_file_path(type_name))
}

/// Ensure all parent directories exist for a path.
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Write a file atomically (write to .tmp, then rename).
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|s| s.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, contents)
        .map_err(|e| anyhow!("Failed to write temp file {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        anyhow!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })?;
    Ok(())
}

/// Last-modified time of a file in milliseconds since the Unix epoch (0 if unknown).
pub fn modified_ms(path: &Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Collect every regular file below `dir`, as sorted `/`-separated relative paths.
pub fn collect_relative_files(dir: &Path) -> Result<Vec<String>> {
    let mut out = Vec::new();
    collect_into(dir, dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_into(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| anyhow!("Failed to read {}: {}", dir.display(), e))?;
    for entry in entries {
        let path = entry
            .map_err(|e| anyhow!("Failed to read entry in {}: {}", dir.display(), e))?
            .path();
        if path.is_dir() {
            collect_into(root, &path, out)?;
            continue;
        }
        if let Ok(relative) = path.strip_prefix(root) {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }
    Ok(())
}
