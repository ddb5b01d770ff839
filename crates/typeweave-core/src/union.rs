//! Cross-module union of well-known utility types.
//!
//! Some utility types are generated into several library modules, each with a
//! different member set. Every module's own store is searched for the type; if
//! more than one variant exists, the first (in classpath order) survives and
//! every other variant is merged into it.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use typeweave_store::{Classpath, OutputRoot};
use typeweave_types::{names, CompiledType, WeaveError};

use crate::merge::MergeEngine;
use crate::report::UnionReport;

pub struct UnionStep<'a> {
    classpath: &'a Classpath,
    engine: &'a MergeEngine,
}

impl<'a> UnionStep<'a> {
    pub fn new(classpath: &'a Classpath, engine: &'a MergeEngine) -> Self {
        Self { classpath, engine }
    }

    /// Union every variant of `type_name`; never fails, errors go on the report.
    pub fn union(&self, type_name: &str, output: &OutputRoot) -> UnionReport {
        let mut report = UnionReport::new(type_name);
        match self.try_union(type_name, output, &mut report) {
            Ok(Some(path)) => report.written = Some(path),
            Ok(None) => {}
            Err(e) => {
                warn!(type_name = %type_name, error = %e, "error while merging builtin union");
                report.error = Some(e.to_string());
            }
        }
        report
    }

    fn try_union(
        &self,
        type_name: &str,
        output: &OutputRoot,
        report: &mut UnionReport,
    ) -> Result<Option<PathBuf>, WeaveError> {
        let chain = names::nesting_chain(type_name);
        let mut variants: Vec<Arc<CompiledType>> = Vec::new();
        for module in self.classpath.modules() {
            let Some(outer) = module.load_outermost(type_name)? else {
                continue;
            };
            if outer.find_nested(&chain).is_some() {
                report.variants.push(module.label());
                variants.push(outer);
            }
        }
        info!(type_name = %type_name, variants = variants.len(), "found builtin union variants");

        let mut remaining = variants.iter();
        let Some(first) = remaining.next() else {
            return Ok(None);
        };
        if variants.len() < 2 {
            return Ok(None);
        }

        let mut surviving = CompiledType::clone(first);
        let target = nested_mut(&mut surviving, &chain)
            .ok_or_else(|| WeaveError::not_found(type_name))?;
        for variant in remaining {
            let mixin = variant
                .find_nested(&chain)
                .ok_or_else(|| WeaveError::not_found(type_name))?;
            self.engine.merge_mixin(target, mixin, true, &mut report.outcome);
        }
        output.write_type(&surviving).map(Some)
    }
}

fn nested_mut<'t>(ty: &'t mut CompiledType, chain: &[&str]) -> Option<&'t mut CompiledType> {
    let mut current = ty;
    for inner in chain {
        current = current.nested_type_mut(inner)?;
    }
    Some(current)
}
