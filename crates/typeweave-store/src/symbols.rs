//! Per-module symbol stores.
//!
//! A [`ModuleSymbolStore`] resolves qualified type names against exactly one
//! library module. It never consults another module, so two modules that
//! define the same qualified name keep distinct definitions.
//!
//! Decoded outermost types are cached; nested types are resolved by walking
//! the outermost type's `nested` list along the name's nesting chain.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use typeweave_types::{decode_type, names, CompiledType, WeaveError};

use crate::entry::ClasspathEntry;

/// Name -> compiled type lookup.
pub trait SymbolStore {
    /// Load a type by qualified name; `NotFound` if the store has no such type.
    fn load(&self, name: &str) -> Result<CompiledType, WeaveError>;

    /// Check if a type exists (without surfacing load errors).
    fn contains(&self, name: &str) -> bool {
        self.load(name).is_ok()
    }
}

/// Isolated symbol store over one classpath entry.
pub struct ModuleSymbolStore {
    entry: Arc<ClasspathEntry>,
    cache: RwLock<HashMap<String, Arc<CompiledType>>>,
}

impl ModuleSymbolStore {
    pub fn new(entry: ClasspathEntry) -> Self {
        Self::from_shared(Arc::new(entry))
    }

    pub fn from_shared(entry: Arc<ClasspathEntry>) -> Self {
        Self {
            entry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn entry(&self) -> &Arc<ClasspathEntry> {
        &self.entry
    }

    pub fn label(&self) -> String {
        self.entry.label()
    }

    /// Load (and cache) the outermost type enclosing `name`.
    ///
    /// `Ok(None)` if this module has no file for it.
    pub fn load_outermost(&self, name: &str) -> Result<Option<Arc<CompiledType>>, WeaveError> {
        let outer = names::outermost(name);
        if let Some(cached) = self.cache.read().get(outer) {
            return Ok(Some(cached.clone()));
        }

        let Some(bytes) = self.entry.read_type_bytes(outer)? else {
            return Ok(None);
        };
        let context = format!("{}:{}", self.entry.label(), names::type_entry_path(outer));
        let ty = decode_type(&bytes, &context)?;
        if ty.name != outer {
            return Err(WeaveError::malformed(
                context,
                format!("file declares {} instead of {}", ty.name, outer),
            ));
        }
        debug!(module = %self.entry.label(), type_name = %outer, "decoded type file");

        let ty = Arc::new(ty);
        self.cache.write().insert(outer.to_string(), ty.clone());
        Ok(Some(ty))
    }

    /// Number of decoded outermost types held in the cache.
    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }
}

impl SymbolStore for ModuleSymbolStore {
    fn load(&self, name: &str) -> Result<CompiledType, WeaveError> {
        let outer = self
            .load_outermost(name)?
            .ok_or_else(|| WeaveError::not_found(name))?;
        let chain = names::nesting_chain(name);
        outer
            .find_nested(&chain)
            .cloned()
            .ok_or_else(|| WeaveError::not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{atomic_write, type_file_in};
    use tempfile::TempDir;
    use typeweave_types::{encode_type, MethodDef, Signature};

    fn module_with(types: &[CompiledType]) -> (TempDir, ModuleSymbolStore) {
        let temp_dir = TempDir::new().unwrap();
        for ty in types {
            let path = type_file_in(temp_dir.path(), &ty.name);
            atomic_write(&path, &encode_type(ty).unwrap()).unwrap();
        }
        let store = ModuleSymbolStore::new(ClasspathEntry::Directory(temp_dir.path().to_path_buf()));
        (temp_dir, store)
    }

    #[test]
    fn test_load_top_level_and_nested() {
        let outer = CompiledType::class("def.lib.Outer").with_nested(
            CompiledType::class("Inner").with_method(MethodDef::new("f", Signature::unit())),
        );
        let (_dir, store) = module_with(&[outer]);

        let inner = store.load("def.lib.Outer$Inner").unwrap();
        assert_eq!(inner.name, "def.lib.Outer$Inner");
        assert!(inner.has_method("f"));
        assert!(store.contains("def.lib.Outer"));
        assert_eq!(store.cached_count(), 1);
    }

    #[test]
    fn test_missing_type_is_not_found() {
        let (_dir, store) = module_with(&[CompiledType::class("def.lib.Outer")]);
        assert!(store.load("def.lib.Other").unwrap_err().is_not_found());
        assert!(store.load("def.lib.Outer$Nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_misnamed_file_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let ty = CompiledType::class("def.lib.Real");
        let path = type_file_in(temp_dir.path(), "def.lib.Claimed");
        atomic_write(&path, &encode_type(&ty).unwrap()).unwrap();
        let store = ModuleSymbolStore::new(ClasspathEntry::Directory(temp_dir.path().to_path_buf()));
        assert_eq!(store.load("def.lib.Claimed").unwrap_err().kind(), "malformed");
    }

    #[test]
    fn test_stores_are_isolated() {
        let (_a, store_a) = module_with(&[CompiledType::class("def.lib.OnlyInA")]);
        let (_b, store_b) = module_with(&[CompiledType::class("def.lib.OnlyInB")]);
        assert!(store_a.contains("def.lib.OnlyInA"));
        assert!(!store_a.contains("def.lib.OnlyInB"));
        assert!(!store_b.contains("def.lib.OnlyInA"));
    }
}
