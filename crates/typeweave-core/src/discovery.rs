//! Discovery of library packages and the target -> mixins mapping.
//!
//! The output tree of the configured namespace is walked depth-first. For
//! every directory the package descriptor type of the matching package is
//! loaded through the classpath; a descriptor carrying the root marker makes
//! the package a library package. Subdirectories are always visited, since a
//! library package may sit below packages that are not.
//!
//! Each library package lists its mixins on the root marker; each mixin names
//! its target on its own mixin marker. Unresolvable descriptors, mixins or
//! targets are skipped without error.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use typeweave_store::{OutputRoot, SymbolStore};
use typeweave_types::{names, TypeRef};

use crate::config::MergeConfig;
use crate::markers::MarkerReader;
use crate::well_known::props;

/// Target type name -> mixin type names, both in discovery order.
pub type MergeMapping = IndexMap<String, Vec<String>>;

pub struct Discovery<'a> {
    classpath: &'a dyn SymbolStore,
    reader: &'a MarkerReader<'a>,
    config: &'a MergeConfig,
}

impl<'a> Discovery<'a> {
    pub fn new(
        classpath: &'a dyn SymbolStore,
        reader: &'a MarkerReader<'a>,
        config: &'a MergeConfig,
    ) -> Self {
        Self {
            classpath,
            reader,
            config,
        }
    }

    /// Dotted names of every library package below the namespace root, in walk order.
    pub fn library_packages(&self, output: &OutputRoot) -> Vec<String> {
        let mut packages = Vec::new();
        let start = output.namespace_dir(&self.config.namespace);
        if start.is_dir() {
            self.walk(output.root(), &start, &mut packages);
        } else {
            debug!(dir = %start.display(), "namespace directory does not exist");
        }
        packages
    }

    fn walk(&self, root: &Path, dir: &Path, packages: &mut Vec<String>) {
        if let Some(package) = names::package_name_for_dir(root, dir) {
            if self.is_library_package(&package) {
                debug!(package = %package, "found library package");
                packages.push(package);
            }
        }

        let mut subdirs: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect(),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot list directory");
                return;
            }
        };
        subdirs.sort();
        for subdir in subdirs {
            self.walk(root, &subdir, packages);
        }
    }

    fn is_library_package(&self, package: &str) -> bool {
        let descriptor_name = names::package_info_name(package);
        match self.classpath.load(&descriptor_name) {
            Ok(descriptor) => self
                .reader
                .read_marker(&descriptor, &self.config.root_marker)
                .is_some(),
            Err(e) if e.is_not_found() => false,
            Err(e) => {
                warn!(package = %package, error = %e, "cannot load package descriptor");
                false
            }
        }
    }

    /// Mixins declared by a library package's root marker.
    pub fn declared_mixins(&self, package: &str) -> Vec<TypeRef> {
        let Ok(descriptor) = self.classpath.load(&names::package_info_name(package)) else {
            return Vec::new();
        };
        self.reader
            .read_marker(&descriptor, &self.config.root_marker)
            .and_then(|root| self.reader.get_property::<Vec<TypeRef>>(&root, props::MIXINS))
            .unwrap_or_default()
    }

    /// Target named by a mixin's own marker.
    pub fn mixin_target(&self, mixin: &str) -> Option<TypeRef> {
        let mixin_type = match self.classpath.load(mixin) {
            Ok(ty) => ty,
            Err(e) if e.is_not_found() => return None,
            Err(e) => {
                warn!(mixin = %mixin, error = %e, "cannot load mixin");
                return None;
            }
        };
        let marker = self.reader.read_marker(&mixin_type, &self.config.mixin_marker)?;
        self.reader.get_property::<TypeRef>(&marker, props::TARGET)
    }

    /// Build the full mapping for the output tree.
    pub fn build_mapping(&self, output: &OutputRoot) -> MergeMapping {
        let mut mapping = MergeMapping::new();
        for package in self.library_packages(output) {
            for mixin in self.declared_mixins(&package) {
                let Some(target) = self.mixin_target(mixin.name()) else {
                    debug!(mixin = %mixin, "mixin has no resolvable target");
                    continue;
                };
                mapping
                    .entry(target.0)
                    .or_default()
                    .push(mixin.0);
            }
        }
        mapping
    }
}
