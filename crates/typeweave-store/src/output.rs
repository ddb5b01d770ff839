//! Output root: where merged type files are written back.

use std::path::{Path, PathBuf};

use typeweave_types::{decode_type, encode_type, names, CompiledType, WeaveError};

use crate::paths::{atomic_write, type_file_in};

/// Handle to the compiled-output directory.
///
/// Every component that writes receives this handle explicitly.
#[derive(Debug, Clone)]
pub struct OutputRoot {
    root: PathBuf,
}

impl OutputRoot {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the subtree of `namespace` (dotted or single segment).
    pub fn namespace_dir(&self, namespace: &str) -> PathBuf {
        namespace
            .split('.')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |dir, part| dir.join(part))
    }

    /// File that holds `type_name` below this root.
    pub fn path_for(&self, type_name: &str) -> PathBuf {
        type_file_in(&self.root, type_name)
    }

    /// Write an outermost type over its previously compiled file.
    pub fn write_type(&self, ty: &CompiledType) -> Result<PathBuf, WeaveError> {
        if names::outermost(&ty.name) != ty.name {
            return Err(WeaveError::malformed(
                &ty.name,
                "only outermost types have their own file",
            ));
        }
        let path = self.path_for(&ty.name);
        let bytes = encode_type(ty)?;
        atomic_write(&path, &bytes).map_err(|e| WeaveError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(path)
    }

    /// Read back the file holding `type_name` (its outermost type).
    pub fn read_type(&self, type_name: &str) -> Result<CompiledType, WeaveError> {
        let path = self.path_for(type_name);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WeaveError::not_found(type_name))
            }
            Err(e) => return Err(WeaveError::io(&path, &e)),
        };
        decode_type(&bytes, &path.display().to_string())
    }
}
