//! Merge configuration.
//!
//! The library never reads flags or the environment on its own; callers build
//! a [`MergeConfig`] (defaults, [`MergeConfig::from_env`] or
//! [`MergeConfig::from_json_file`]) and hand it to the merger.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use typeweave_types::env_utils::{env_list, env_string};

use crate::well_known;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Root namespace below the output root that is scanned for library packages
    pub namespace: String,
    /// Marker type on package descriptors
    pub root_marker: String,
    /// Marker type on mixins
    pub mixin_marker: String,
    /// Simple name of the target that gets the nested-type field guard
    pub string_types_interface: String,
    /// Utility types unioned across every module
    pub builtin_unions: Vec<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            namespace: well_known::DEFAULT_NAMESPACE.to_string(),
            root_marker: well_known::names::ROOT.to_string(),
            mixin_marker: well_known::names::MIXIN.to_string(),
            string_types_interface: well_known::STRING_TYPES_INTERFACE.to_string(),
            builtin_unions: well_known::BUILTIN_UNIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl MergeConfig {
    /// Defaults overlaid with `TYPEWEAVE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlay `TYPEWEAVE_NAMESPACE`, `TYPEWEAVE_ROOT_MARKER`,
    /// `TYPEWEAVE_MIXIN_MARKER` and `TYPEWEAVE_BUILTIN_UNIONS` onto `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(namespace) = env_string("TYPEWEAVE_NAMESPACE") {
            self.namespace = namespace;
        }
        if let Some(marker) = env_string("TYPEWEAVE_ROOT_MARKER") {
            self.root_marker = marker;
        }
        if let Some(marker) = env_string("TYPEWEAVE_MIXIN_MARKER") {
            self.mixin_marker = marker;
        }
        let unions = env_list("TYPEWEAVE_BUILTIN_UNIONS");
        if !unions.is_empty() {
            self.builtin_unions = unions;
        }
        self
    }

    /// Load from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
        serde_json::from_str(&json)
            .map_err(|e| anyhow!("Failed to parse config {}: {}", path.display(), e))
    }
}
