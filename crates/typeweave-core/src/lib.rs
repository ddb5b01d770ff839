//! Mixin composition for compiled type libraries.
//!
//! Library modules declare target types and, separately, mixin types meant to
//! be merged into those targets. This crate finds the declarations and
//! produces merged target types:
//!
//! 1. [`discovery`] walks the output tree and builds the target -> mixins mapping
//!    from [`markers`] on package descriptors and mixin types.
//! 2. [`merge`] copies mixin members into each target and writes it back.
//! 3. [`union`] unions the variants of well-known utility types found in
//!    several modules.
//!
//! [`MixinMerger`] runs all three and returns a [`MergeReport`].
//!
//! # Example
//!
//! ```ignore
//! use typeweave_core::{MergeConfig, MixinMerger};
//! use typeweave_store::{Classpath, OutputRoot};
//!
//! let classpath = Classpath::open(["target/out", "libs/dom.twar"]);
//! let merger = MixinMerger::new(MergeConfig::default(), classpath, OutputRoot::new("target/out"));
//! let report = merger.merge();
//! ```

pub mod config;
pub mod discovery;
pub mod markers;
pub mod merge;
pub mod merger;
pub mod report;
pub mod union;
pub mod well_known;

pub use config::MergeConfig;
pub use discovery::{Discovery, MergeMapping};
pub use markers::{MarkerInstance, MarkerLoader, MarkerReader};
pub use merge::MergeEngine;
pub use merger::MixinMerger;
pub use report::{MergeOutcome, MergeReport, TargetReport, UnionReport};
pub use union::UnionStep;
