//! Merge pool: the mutable, whole-classpath view used while merging.
//!
//! The pool resolves a name against the classpath in order and keeps the
//! first definition it finds. Decoded outermost types stay in the pool for
//! the whole run, so a mutation made while merging one target is visible
//! when the same type is loaded again later (for example as another target's
//! mixin).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use typeweave_types::{decode_type, names, CompiledType, WeaveError};

use crate::entry::ClasspathEntry;
use crate::output::OutputRoot;

pub struct MergePool {
    entries: Vec<Arc<ClasspathEntry>>,
    types: HashMap<String, CompiledType>,
}

impl MergePool {
    pub fn new(entries: Vec<Arc<ClasspathEntry>>) -> Self {
        Self {
            entries,
            types: HashMap::new(),
        }
    }

    /// Ensure the outermost type enclosing `name` is resident; return its qualified name.
    fn resident(&mut self, name: &str) -> Result<String, WeaveError> {
        let outer = names::outermost(name).to_string();
        if self.types.contains_key(&outer) {
            return Ok(outer);
        }
        for entry in &self.entries {
            let Some(bytes) = entry.read_type_bytes(&outer)? else {
                continue;
            };
            let context = format!("{}:{}", entry.label(), names::type_entry_path(&outer));
            let ty = decode_type(&bytes, &context)?;
            debug!(module = %entry.label(), type_name = %outer, "merge pool loaded type");
            self.types.insert(outer.clone(), ty);
            return Ok(outer);
        }
        Err(WeaveError::not_found(name))
    }

    /// Current definition of `name` (nested names are resolved through their outermost type).
    pub fn load(&mut self, name: &str) -> Result<&CompiledType, WeaveError> {
        let outer = self.resident(name)?;
        let chain = names::nesting_chain(name);
        self.types
            .get(&outer)
            .and_then(|ty| ty.find_nested(&chain))
            .ok_or_else(|| WeaveError::not_found(name))
    }

    /// Mutable definition of `name`; changes persist in the pool.
    pub fn load_mut(&mut self, name: &str) -> Result<&mut CompiledType, WeaveError> {
        let outer = self.resident(name)?;
        let chain = names::nesting_chain(name);
        let mut current = self
            .types
            .get_mut(&outer)
            .ok_or_else(|| WeaveError::not_found(name))?;
        for inner in chain {
            current = current
                .nested_type_mut(inner)
                .ok_or_else(|| WeaveError::not_found(name))?;
        }
        Ok(current)
    }

    /// Write the outermost type enclosing `name` to the output root.
    pub fn write_back(&mut self, name: &str, output: &OutputRoot) -> Result<PathBuf, WeaveError> {
        let outer = self.resident(name)?;
        let ty = self
            .types
            .get(&outer)
            .ok_or_else(|| WeaveError::not_found(name))?;
        output.write_type(ty)
    }

    /// Number of resident outermost types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{atomic_write, type_file_in};
    use tempfile::TempDir;
    use typeweave_types::{encode_type, FieldDef, TypeSig};

    fn pool_over(roots: &[&std::path::Path]) -> MergePool {
        MergePool::new(
            roots
                .iter()
                .map(|r| Arc::new(ClasspathEntry::Directory(r.to_path_buf())))
                .collect(),
        )
    }

    #[test]
    fn test_mutations_persist_and_write_back() {
        let temp_dir = TempDir::new().unwrap();
        let module = temp_dir.path().join("module");
        let ty = CompiledType::class("def.lib.A").with_nested(CompiledType::class("Inner"));
        atomic_write(&type_file_in(&module, &ty.name), &encode_type(&ty).unwrap()).unwrap();

        let mut pool = pool_over(&[&module]);
        pool.load_mut("def.lib.A$Inner")
            .unwrap()
            .add_field(FieldDef::new("added", TypeSig::Bool))
            .unwrap();
        assert!(pool.load("def.lib.A$Inner").unwrap().has_field("added"));
        assert_eq!(pool.len(), 1);

        let out = OutputRoot::new(temp_dir.path().join("out"));
        let path = pool.write_back("def.lib.A$Inner", &out).unwrap();
        assert!(path.ends_with("def/lib/A.ctype"));
        let written = out.read_type("def.lib.A").unwrap();
        assert!(written.find_nested(&["Inner"]).unwrap().has_field("added"));
    }

    #[test]
    fn test_first_definition_wins() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        let from_a = CompiledType::class("def.lib.T").with_field(FieldDef::new("a", TypeSig::Int));
        let from_b = CompiledType::class("def.lib.T").with_field(FieldDef::new("b", TypeSig::Int));
        atomic_write(&type_file_in(&a, &from_a.name), &encode_type(&from_a).unwrap()).unwrap();
        atomic_write(&type_file_in(&b, &from_b.name), &encode_type(&from_b).unwrap()).unwrap();

        let mut pool = pool_over(&[&b, &a]);
        assert!(pool.load("def.lib.T").unwrap().has_field("b"));
        assert!(pool.load("def.lib.Missing").unwrap_err().is_not_found());
    }
}
