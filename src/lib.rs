//! typeweave
//!
//! Post-compilation mixin composition for compiled type libraries:
//!
//! - **Model**: compiled types, markers and their binary codec ([`types`])
//! - **Stores**: per-module symbol stores, archives and the merge pool ([`store`])
//! - **Merging**: discovery, the merge engine and the cross-module union step ([`engine`])
//! - **Descriptors**: library name/version extraction from archives ([`descriptor`])
//!
//! See [`engine::MixinMerger`] for a whole merge run.

pub use typeweave_core as engine;
pub use typeweave_descriptor as descriptor;
pub use typeweave_store as store;
pub use typeweave_types as types;
