//! Ordered classpath of library modules.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

use typeweave_types::{CompiledType, WeaveError};

use crate::entry::ClasspathEntry;
use crate::pool::MergePool;
use crate::symbols::{ModuleSymbolStore, SymbolStore};

/// The library modules of one run, in classpath order, each with its own
/// isolated [`ModuleSymbolStore`].
pub struct Classpath {
    modules: Vec<ModuleSymbolStore>,
}

impl Classpath {
    /// Open every entry; entries that cannot be opened are logged and left out.
    pub fn open<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut modules = Vec::new();
        for path in paths {
            let path = path.into();
            match ClasspathEntry::open(&path) {
                Ok(entry) => {
                    debug!(entry = %path.display(), "opened classpath entry");
                    modules.push(ModuleSymbolStore::new(entry));
                }
                Err(e) => {
                    error!(entry = %path.display(), error = %e, "wrong classpath entry");
                }
            }
        }
        Self { modules }
    }

    /// Per-module stores, in classpath order.
    pub fn modules(&self) -> &[ModuleSymbolStore] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// A fresh mutable pool over the whole classpath (first occurrence wins).
    pub fn merge_pool(&self) -> MergePool {
        MergePool::new(self.modules.iter().map(|m| m.entry().clone()).collect::<Vec<Arc<_>>>())
    }
}

/// First-wins lookup across all modules.
impl SymbolStore for Classpath {
    fn load(&self, name: &str) -> Result<CompiledType, WeaveError> {
        for module in &self.modules {
            match module.load(name) {
                Ok(ty) => return Ok(ty),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Err(WeaveError::not_found(name))
    }
}
