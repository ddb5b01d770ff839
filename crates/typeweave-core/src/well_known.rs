//! Well-known marker types and utility type names.
//!
//! Host definitions of the two marker types are built once. They are only
//! consulted when no library module on the classpath defines the marker
//! type itself.
//!
//! # Usage
//!
//! ```ignore
//! use typeweave_core::well_known::{markers, props};
//!
//! let root = markers::ROOT.clone();
//! assert!(root.has_method(props::MIXINS));
//! ```

/// Default root namespace scanned for library packages.
pub const DEFAULT_NAMESPACE: &str = "def";

/// Simple name of the generated string-keyed type interface.
pub const STRING_TYPES_INTERFACE: &str = "StringTypes";

/// Utility types unioned across modules by default.
pub const BUILTIN_UNIONS: &[&str] = &["typeweave.util.StringTypes"];

/// Marker type names.
pub mod names {
    /// Marker on a package descriptor declaring a library package
    pub const ROOT: &str = "typeweave.lang.Root";
    /// Marker on a mixin type naming its merge target
    pub const MIXIN: &str = "typeweave.lang.Mixin";
}

/// Marker property (accessor) names.
pub mod props {
    /// `Root.mixins: TypeRef[]`
    pub const MIXINS: &str = "mixins";
    /// `Mixin.target: TypeRef`
    pub const TARGET: &str = "target";
}

/// Host definitions of the marker types.
pub mod markers {
    use std::sync::LazyLock;

    use typeweave_types::{CompiledType, MarkerValue, MethodDef, Signature, TypeKind, TypeSig};

    fn class_array() -> TypeSig {
        TypeSig::Array(Box::new(TypeSig::Object("typeweave.lang.Class".into())))
    }

    /// `Root { mixins() default {} }`
    pub static ROOT: LazyLock<CompiledType> = LazyLock::new(|| {
        CompiledType::new(super::names::ROOT, TypeKind::Marker).with_method(
            MethodDef::new(super::props::MIXINS, Signature::new(Vec::new(), class_array()))
                .with_marker_default(MarkerValue::Array(Vec::new())),
        )
    });

    /// `Mixin { target() }`
    pub static MIXIN: LazyLock<CompiledType> = LazyLock::new(|| {
        CompiledType::new(super::names::MIXIN, TypeKind::Marker).with_method(MethodDef::new(
            super::props::TARGET,
            Signature::new(Vec::new(), TypeSig::Object("typeweave.lang.Class".into())),
        ))
    });

    /// Host marker definitions, renamed to the configured marker names.
    pub fn host_definitions(root_marker: &str, mixin_marker: &str) -> Vec<CompiledType> {
        let mut root = ROOT.clone();
        root.rename(root_marker);
        let mut mixin = MIXIN.clone();
        mixin.rename(mixin_marker);
        vec![root, mixin]
    }
}
