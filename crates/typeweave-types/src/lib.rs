//! Shared types for the typeweave workspace.
//!
//! This crate provides the compiled-type model used by every other crate:
//!
//! - [`compiled`]: [`CompiledType`] and its members, plus [`Rebind`] for copying
//!   members between owner types
//! - [`marker`]: declarative markers and typed property conversion
//! - [`names`]: qualified-name and type-file path rules
//! - [`encoding`]: BCS type-file codec, digests and JSON helpers
//! - [`errors`]: the [`WeaveError`] taxonomy

pub mod compiled;
pub mod encoding;
pub mod env_utils;
pub mod errors;
pub mod marker;
pub mod names;

// Re-export commonly used types at crate root
pub use compiled::{
    access, CompiledType, Constant, ConstructorDef, FieldDef, MethodBody, MethodDef, Rebind,
    Signature, TypeKind, TypeSig,
};
pub use encoding::{decode_type, encode_type, type_digest};
pub use errors::WeaveError;
pub use marker::{FromMarkerValue, Marker, MarkerValue, TypeRef};
