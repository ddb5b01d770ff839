//! Merge engine: structural copy of mixin members into a target type.
//!
//! `merge_mixin` copies, in this order:
//!
//! | Step | Members | Rule |
//! |------|---------|------|
//! | 1 | nested types | create the nested type if absent, then merge recursively |
//! | 2 | methods | copy when the target has no method of that simple name |
//! | 3 | fields | copy when the target has no field of that name |
//! | 4 | constructors | always attempted; a duplicate descriptor is ignored |
//!
//! Existing target members are never replaced. Copied members are rebound
//! from the mixin's name to the target's name. A failure on one member is
//! counted and logged; the remaining members are still processed.
//!
//! ## Usage
//!
//! ```ignore
//! use typeweave_core::merge::MergeEngine;
//!
//! let engine = MergeEngine::new("StringTypes");
//! let report = engine.merge_mixins(&mut pool, &output, "def.lib.Target", &mixins);
//! println!("added {}", report.outcome.added);
//! ```

use std::path::PathBuf;
use tracing::{debug, warn};

use typeweave_store::{MergePool, OutputRoot};
use typeweave_types::{names, type_digest, CompiledType, Rebind, WeaveError};

use crate::report::{MergeOutcome, TargetReport};

pub struct MergeEngine {
    string_types_interface: String,
}

impl MergeEngine {
    /// `string_types_interface` is the simple name of the one target that gets
    /// the nested-type field guard.
    pub fn new(string_types_interface: impl Into<String>) -> Self {
        Self {
            string_types_interface: string_types_interface.into(),
        }
    }

    /// Merge every mixin into `target` (in order) and write the target back.
    ///
    /// Never fails: errors are logged and recorded on the returned report.
    pub fn merge_mixins(
        &self,
        pool: &mut MergePool,
        output: &OutputRoot,
        target: &str,
        mixins: &[String],
    ) -> TargetReport {
        let mut report = TargetReport::new(target, mixins);
        match self.try_merge_mixins(pool, output, &mut report) {
            Ok(path) => {
                debug!(
                    target = %target,
                    added = report.outcome.added,
                    ignored = report.outcome.ignored_duplicates,
                    path = %path.display(),
                    "merged target written"
                );
                report.written = Some(path);
            }
            Err(e) => {
                warn!(target = %target, kind = e.kind(), error = %e, "error while merging mixins");
                report.error = Some(e.to_string());
            }
        }
        report
    }

    fn try_merge_mixins(
        &self,
        pool: &mut MergePool,
        output: &OutputRoot,
        report: &mut TargetReport,
    ) -> Result<PathBuf, WeaveError> {
        let target = report.target.clone();
        report.digest_before = Some(type_digest(pool.load(&target)?)?);

        for mixin_name in &report.mixins {
            debug!(target = %target, mixin = %mixin_name, "merging mixin");
            let mixin = pool.load(mixin_name)?.clone();
            let target_type = pool.load_mut(&target)?;
            self.merge_mixin(target_type, &mixin, true, &mut report.outcome);
        }

        report.digest_after = Some(type_digest(pool.load(&target)?)?);
        pool.write_back(&target, output)
    }

    /// Copy `mixin`'s members into `target`, accumulating into `outcome`.
    ///
    /// `verbose` enables per-member debug events; nested merges run quietly.
    pub fn merge_mixin(
        &self,
        target: &mut CompiledType,
        mixin: &CompiledType,
        verbose: bool,
        outcome: &mut MergeOutcome,
    ) {
        let from = mixin.name.as_str();
        let to = target.name.clone();

        for nested in &mixin.nested {
            if self.skips_string_types_entry(target, nested) {
                if verbose {
                    debug!(target = %to, nested = %nested.name, "string types entry already declared");
                }
                continue;
            }
            let (inner, created) =
                target.nested_or_insert(nested.inner_name(), nested.kind, nested.access);
            if created {
                outcome.added += 1;
                if verbose {
                    debug!(target = %to, nested = %inner.name, "added nested type");
                }
            }
            self.merge_mixin(inner, nested, false, outcome);
        }

        for method in &mixin.methods {
            if target.has_method(&method.name) {
                Self::ignored(verbose, &to, "method", &method.name, outcome);
                continue;
            }
            let result = target.add_method(method.rebind(from, &to));
            Self::record(result, verbose, &to, "method", &method.name, outcome);
        }

        for field in &mixin.fields {
            if target.has_field(&field.name) {
                Self::ignored(verbose, &to, "field", &field.name, outcome);
                continue;
            }
            let result = target.add_field(field.rebind(from, &to));
            Self::record(result, verbose, &to, "field", &field.name, outcome);
        }

        for ctor in &mixin.constructors {
            let result = target.add_constructor(ctor.rebind(from, &to));
            Self::record(result, verbose, &to, "constructor", &ctor.identity(), outcome);
        }
    }

    /// The `StringTypes` target already declares a field for this nested
    /// entry (`StringTypes$div` against field `div`).
    fn skips_string_types_entry(&self, target: &CompiledType, nested: &CompiledType) -> bool {
        target.simple_name() == self.string_types_interface
            && target.has_field(names::strip_outer_prefix(nested.simple_name()))
    }

    fn ignored(verbose: bool, target: &str, member_kind: &str, member: &str, outcome: &mut MergeOutcome) {
        outcome.ignored_duplicates += 1;
        if verbose {
            debug!(target = %target, kind = member_kind, member = %member, "ignored duplicate");
        }
    }

    fn record(
        result: Result<(), WeaveError>,
        verbose: bool,
        target: &str,
        member_kind: &str,
        member: &str,
        outcome: &mut MergeOutcome,
    ) {
        match result {
            Ok(()) => {
                outcome.added += 1;
                if verbose {
                    debug!(target = %target, kind = member_kind, member = %member, "added member");
                }
            }
            Err(e) if e.is_duplicate_member() => {
                Self::ignored(verbose, target, member_kind, member, outcome)
            }
            // An invalid member (for example an empty name from a damaged
            // type file) is rejected as malformed.
            Err(e) => {
                outcome.failed += 1;
                warn!(
                    target = %target,
                    kind = member_kind,
                    member = %member,
                    error = %e,
                    "failed to copy member"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeweave_types::{
        ConstructorDef, Constant, FieldDef, MethodBody, MethodDef, Signature, TypeKind, TypeSig,
    };

    fn method(name: &str, marker: u8) -> MethodDef {
        MethodDef::new(name, Signature::unit()).with_body(MethodBody {
            max_stack: 1,
            max_locals: 1,
            code: vec![marker],
            constants: vec![],
        })
    }

    fn merge(target: &mut CompiledType, mixin: &CompiledType) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        MergeEngine::new("StringTypes").merge_mixin(target, mixin, true, &mut outcome);
        outcome
    }

    #[test]
    fn test_existing_member_is_not_overwritten() {
        let mut target = CompiledType::class("def.lib.T").with_method(method("n", 1));
        let before = target.methods[0].clone();
        let mixin = CompiledType::class("def.lib.M").with_method(method("n", 2));

        let outcome = merge(&mut target, &mixin);
        assert_eq!(target.methods, vec![before]);
        assert_eq!(outcome.ignored_duplicates, 1);
        assert_eq!(outcome.added, 0);
    }

    #[test]
    fn test_overloads_share_one_slot() {
        let mut target = CompiledType::class("def.lib.T").with_method(method("f", 1));
        let mixin = CompiledType::class("def.lib.M").with_method(MethodDef::new(
            "f",
            Signature::new(vec![TypeSig::Int], TypeSig::Void),
        ));
        let outcome = merge(&mut target, &mixin);
        assert_eq!(target.methods.len(), 1);
        assert_eq!(outcome.ignored_duplicates, 1);
    }

    #[test]
    fn test_copied_members_are_rebound() {
        let mut target = CompiledType::class("def.lib.T");
        let mixin = CompiledType::class("def.lib.M")
            .with_field(
                FieldDef::new("self_ref", TypeSig::Object("def.lib.M".into()))
                    .with_constant(Constant::TypeRef("def.lib.M".into())),
            )
            .with_constructor(ConstructorDef::new(vec![TypeSig::Object("def.lib.M".into())]));

        let outcome = merge(&mut target, &mixin);
        assert_eq!(outcome.added, 2);
        assert_eq!(target.fields[0].ty, TypeSig::Object("def.lib.T".into()));
        assert_eq!(
            target.fields[0].constant_value,
            Some(Constant::TypeRef("def.lib.T".into()))
        );
        assert_eq!(target.constructors[0].identity(), "<init>(def.lib.T)void");
    }

    #[test]
    fn test_invalid_member_is_counted_as_failed() {
        let mut target = CompiledType::class("def.lib.T");
        let mixin = CompiledType::class("def.lib.M")
            .with_field(FieldDef::new("", TypeSig::Int))
            .with_method(MethodDef::new("bad/name", Signature::unit()))
            .with_field(FieldDef::new("ok", TypeSig::Int));

        let outcome = merge(&mut target, &mixin);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.added, 1);
        assert!(target.has_field("ok"));
        assert!(target.methods.is_empty());
    }

    #[test]
    fn test_duplicate_constructor_is_ignored() {
        let mut target = CompiledType::class("def.lib.T").with_constructor(ConstructorDef::new(vec![]));
        let mixin = CompiledType::class("def.lib.M")
            .with_constructor(ConstructorDef::new(vec![]))
            .with_constructor(ConstructorDef::new(vec![TypeSig::Str]));
        let outcome = merge(&mut target, &mixin);
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.ignored_duplicates, 1);
        assert_eq!(target.constructors.len(), 2);
    }

    #[test]
    fn test_nested_type_created_with_matching_kind() {
        let mut target = CompiledType::class("def.lib.T");
        let mut record = CompiledType::new("Data", TypeKind::Record);
        record.fields.push(FieldDef::new("x", TypeSig::Int));
        let mixin = CompiledType::class("def.lib.M").with_nested(record);

        let outcome = merge(&mut target, &mixin);
        let nested = target.nested_type("Data").expect("nested type");
        assert_eq!(nested.name, "def.lib.T$Data");
        assert_eq!(nested.kind, TypeKind::Record);
        assert!(nested.has_field("x"));
        // nested type + its field
        assert_eq!(outcome.added, 2);
    }

    #[test]
    fn test_string_types_guard_skips_declared_entries() {
        let mut target = CompiledType::interface("typeweave.util.StringTypes")
            .with_field(FieldDef::new("div", TypeSig::Str));
        let mixin = CompiledType::interface("typeweave.util.StringTypes")
            .with_nested(CompiledType::interface("div"))
            .with_nested(CompiledType::interface("span"));

        merge(&mut target, &mixin);
        assert!(target.nested_type("div").is_none());
        assert!(target.nested_type("span").is_some());
    }

    #[test]
    fn test_guard_only_applies_to_string_types() {
        let mut target = CompiledType::interface("def.lib.Other")
            .with_field(FieldDef::new("div", TypeSig::Str));
        let mixin = CompiledType::interface("def.lib.M").with_nested(CompiledType::interface("div"));
        merge(&mut target, &mixin);
        assert!(target.nested_type("div").is_some());
    }
}
