//! Single-file module archives.
//!
//! An archive bundles a library module's type files together with packaging
//! metadata (`META-INF/MANIFEST.MF`, a project descriptor). It is a
//! BCS-serialized [`ModuleArchive`].

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::paths::{atomic_write, collect_relative_files, modified_ms};

/// Current archive format version.
pub const ARCHIVE_FORMAT_VERSION: u32 = 1;

/// Conventional file extension for module archives.
pub const ARCHIVE_EXTENSION: &str = "twar";

/// Path of the packaging manifest inside an archive.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// One file stored in an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// `/`-separated path relative to the module root
    pub path: String,
    /// Last-modified time in milliseconds since the Unix epoch
    pub modified_ms: i64,
    pub bytes: Vec<u8>,
}

/// A library module packed into one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleArchive {
    pub format_version: u32,
    pub entries: Vec<ArchiveEntry>,
}

impl Default for ModuleArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleArchive {
    pub fn new() -> Self {
        Self {
            format_version: ARCHIVE_FORMAT_VERSION,
            entries: Vec::new(),
        }
    }

    /// Add an entry, replacing any previous entry with the same path.
    pub fn add(&mut self, path: impl Into<String>, modified_ms: i64, bytes: Vec<u8>) {
        let path = path.into();
        self.entries.retain(|e| e.path != path);
        self.entries.push(ArchiveEntry {
            path,
            modified_ms,
            bytes,
        });
    }

    pub fn entry(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// First entry (in archive order) whose path ends with `suffix`.
    pub fn find_by_suffix(&self, suffix: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.path.ends_with(suffix))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let archive: ModuleArchive =
            bcs::from_bytes(bytes).map_err(|e| anyhow!("Failed to decode module archive: {}", e))?;
        if archive.format_version != ARCHIVE_FORMAT_VERSION {
            return Err(anyhow!(
                "Unsupported module archive version {} (expected {})",
                archive.format_version,
                ARCHIVE_FORMAT_VERSION
            ));
        }
        Ok(archive)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bcs::to_bytes(self).map_err(|e| anyhow!("Failed to encode module archive: {}", e))
    }

    /// Read an archive file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read archive {}", path.display()))?;
        Self::from_bytes(&bytes).with_context(|| format!("decode archive {}", path.display()))
    }

    /// Write the archive atomically.
    pub fn write(&self, path: &Path) -> Result<()> {
        atomic_write(path, &self.to_bytes()?)
    }

    /// Pack every file below `dir` (sorted by path) into a new archive.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut archive = Self::new();
        for relative in collect_relative_files(dir)? {
            let full = dir.join(&relative);
            let bytes =
                std::fs::read(&full).with_context(|| format!("read {}", full.display()))?;
            archive.add(relative, modified_ms(&full), bytes);
        }
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_replaces_same_path() {
        let mut archive = ModuleArchive::new();
        archive.add("a/B.ctype", 1, vec![1]);
        archive.add("a/B.ctype", 2, vec![2]);
        assert_eq!(archive.entries.len(), 1);
        assert_eq!(archive.entry("a/B.ctype").map(|e| e.modified_ms), Some(2));
    }

    #[test]
    fn test_write_then_read() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut archive = ModuleArchive::new();
        archive.add(MANIFEST_PATH, 1_700_000_000_000, b"Manifest-Version: 1.0\n".to_vec());
        archive.add("META-INF/maven/org/lib/pom.xml", 5, b"<project/>".to_vec());

        let path = temp_dir.path().join("lib.twar");
        archive.write(&path)?;
        let read = ModuleArchive::read(&path)?;
        assert_eq!(read, archive);
        assert!(read.find_by_suffix("pom.xml").is_some());
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut archive = ModuleArchive::new();
        archive.format_version = 99;
        let bytes = archive.to_bytes().unwrap();
        let err = ModuleArchive::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("Unsupported module archive version 99"));
    }

    #[test]
    fn test_from_dir_collects_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        atomic_write(&temp_dir.path().join("def/lib/A.ctype"), &[7])?;
        atomic_write(&temp_dir.path().join(MANIFEST_PATH), b"m")?;
        let archive = ModuleArchive::from_dir(temp_dir.path())?;
        let paths: Vec<&str> = archive.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec![MANIFEST_PATH, "def/lib/A.ctype"]);
        Ok(())
    }
}
