//! Symbol stores and filesystem layout for typeweave.
//!
//! - [`entry`]: a classpath entry (module directory or [`archive::ModuleArchive`])
//! - [`symbols`]: [`ModuleSymbolStore`], isolated per module
//! - [`classpath`]: the ordered set of module stores
//! - [`pool`]: [`MergePool`], the mutable first-wins view used during merging
//! - [`output`]: [`OutputRoot`], where merged types are written back
//!
//! # Example
//!
//! ```ignore
//! use typeweave_store::{Classpath, OutputRoot, SymbolStore};
//!
//! let classpath = Classpath::open(["target/lib-a", "libs/lib-b.twar"]);
//! let target = classpath.load("def.jquery.JQuery")?;
//! let mut pool = classpath.merge_pool();
//! pool.write_back(&target.name, &OutputRoot::new("target/out"))?;
//! ```

pub mod archive;
pub mod classpath;
pub mod entry;
pub mod output;
pub mod paths;
pub mod pool;
pub mod symbols;

pub use archive::{ArchiveEntry, ModuleArchive, ARCHIVE_EXTENSION, MANIFEST_PATH};
pub use classpath::Classpath;
pub use entry::ClasspathEntry;
pub use output::OutputRoot;
pub use pool::MergePool;
pub use symbols::{ModuleSymbolStore, SymbolStore};
