//! Classpath entries: a module root directory or a module archive.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use typeweave_types::{names, WeaveError};

use crate::archive::ModuleArchive;
use crate::paths::{collect_relative_files, type_file_in};

/// One library module on the classpath.
#[derive(Debug)]
pub enum ClasspathEntry {
    /// Compiled-output directory; type files live at `<root>/<pkg path>/<Simple>.ctype`.
    Directory(PathBuf),
    /// Module archive loaded fully into memory.
    Archive {
        path: PathBuf,
        archive: ModuleArchive,
    },
}

impl ClasspathEntry {
    /// Open a directory or archive path.
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(ClasspathEntry::Directory(path.to_path_buf()));
        }
        if path.is_file() {
            let archive = ModuleArchive::read(path)?;
            return Ok(ClasspathEntry::Archive {
                path: path.to_path_buf(),
                archive,
            });
        }
        Err(anyhow!("wrong classpath entry: {}", path.display()))
    }

    /// Path this entry was opened from, for diagnostics.
    pub fn label(&self) -> String {
        match self {
            ClasspathEntry::Directory(path) => path.display().to_string(),
            ClasspathEntry::Archive { path, .. } => path.display().to_string(),
        }
    }

    /// Raw bytes of the file holding `type_name` (its outermost type's file).
    ///
    /// `Ok(None)` means this module has no such file.
    pub fn read_type_bytes(&self, type_name: &str) -> Result<Option<Vec<u8>>, WeaveError> {
        match self {
            ClasspathEntry::Directory(root) => {
                let path = type_file_in(root, type_name);
                match std::fs::read(&path) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(WeaveError::io(&path, &e)),
                }
            }
            ClasspathEntry::Archive { archive, .. } => Ok(archive
                .entry(&names::type_entry_path(type_name))
                .map(|e| e.bytes.clone())),
        }
    }

    /// Qualified names of every top-level type file in this module, sorted.
    pub fn type_names(&self) -> Result<Vec<String>> {
        let mut out: Vec<String> = match self {
            ClasspathEntry::Directory(root) => collect_relative_files(root)?
                .iter()
                .filter_map(|p| names::type_name_from_entry_path(p))
                .collect(),
            ClasspathEntry::Archive { archive, .. } => archive
                .entries
                .iter()
                .filter_map(|e| names::type_name_from_entry_path(&e.path))
                .collect(),
        };
        out.sort();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::atomic_write;
    use tempfile::TempDir;
    use typeweave_types::{encode_type, CompiledType};

    #[test]
    fn test_directory_and_archive_agree() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let module = temp_dir.path().join("module");
        let ty = CompiledType::class("def.lib.A");
        atomic_write(&type_file_in(&module, &ty.name), &encode_type(&ty)?)?;

        let dir_entry = ClasspathEntry::open(&module)?;
        let archive_path = temp_dir.path().join("module.twar");
        ModuleArchive::from_dir(&module)?.write(&archive_path)?;
        let archive_entry = ClasspathEntry::open(&archive_path)?;

        for entry in [&dir_entry, &archive_entry] {
            assert_eq!(entry.type_names()?, vec!["def.lib.A".to_string()]);
            assert!(entry.read_type_bytes("def.lib.A$Inner")?.is_some());
            assert!(entry.read_type_bytes("def.lib.Missing")?.is_none());
        }
        Ok(())
    }

    #[test]
    fn test_open_missing_path_fails() {
        let err = ClasspathEntry::open(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains("wrong classpath entry"));
    }
}
