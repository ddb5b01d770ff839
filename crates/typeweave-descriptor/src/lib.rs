//! Library descriptors.
//!
//! A packaged library module carries a project descriptor (`…/pom.xml`) and a
//! packaging manifest. [`LibraryDescriptor`] pulls the library's name, version
//! and model version out of the descriptor's general part (the text before
//! `<dependencies>`), and its last update time out of the manifest entry.
//! Descriptors are used for cache and staleness decisions; the merge engine
//! never looks at them.
//!
//! # Example
//!
//! ```ignore
//! use typeweave_descriptor::LibraryDescriptor;
//!
//! let descriptor = LibraryDescriptor::from_archive_path("libs/jquery.twar".as_ref())?;
//! println!("{}", descriptor); // (jquery-1.10.0-SNAPSHOT,t=1700000000000)
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::path::Path;

use typeweave_store::{ModuleArchive, MANIFEST_PATH};

/// Group id prefix in front of the model version.
pub const DEFAULT_GROUP_PREFIX: &str = "org.typeweave.libraries.";

/// Value used when a descriptor field cannot be found.
pub const UNKNOWN: &str = "unknown";

const DEPENDENCIES_TAG: &str = "<dependencies>";

const ARTIFACT_ID_PATTERN: &str = r"<artifactId>(.*)</artifactId>";
const VERSION_PATTERN: &str = r"<version>(.*)</version>";

#[derive(Debug, Clone, Serialize)]
pub struct LibraryDescriptor {
    pub name: String,
    pub version: String,
    /// Manifest modification time, milliseconds since the Unix epoch
    pub last_update_timestamp: i64,
    pub model_version: String,
}

impl LibraryDescriptor {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        last_update_timestamp: i64,
        model_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            last_update_timestamp,
            model_version: model_version.into(),
        }
    }

    /// Read an archive from disk and extract its descriptor.
    pub fn from_archive_path(path: &Path) -> Result<Self> {
        let archive = ModuleArchive::read(path)?;
        Self::from_archive(&archive).with_context(|| format!("describe {}", path.display()))
    }

    pub fn from_archive(archive: &ModuleArchive) -> Result<Self> {
        Self::from_archive_with_prefix(archive, DEFAULT_GROUP_PREFIX)
    }

    /// Extract a descriptor, reading the model version after `group_prefix`.
    pub fn from_archive_with_prefix(archive: &ModuleArchive, group_prefix: &str) -> Result<Self> {
        let pom = archive
            .find_by_suffix("pom.xml")
            .ok_or_else(|| anyhow!("no pom.xml entry in module archive"))?;
        let text = String::from_utf8_lossy(&pom.bytes);
        let general = general_part(&text);

        let group_pattern = Regex::new(&format!(
            r"<groupId>{}(.*)</groupId>",
            regex::escape(group_prefix)
        ))?;
        let model_version = first_capture(&group_pattern, general);
        let name = first_capture(&Regex::new(ARTIFACT_ID_PATTERN)?, general);
        let version = first_capture(&Regex::new(VERSION_PATTERN)?, general);

        let manifest = archive
            .entry(MANIFEST_PATH)
            .ok_or_else(|| anyhow!("no {} entry in module archive", MANIFEST_PATH))?;

        Ok(Self::new(name, version, manifest.modified_ms, model_version))
    }

    /// Last update time, if the timestamp is in chrono's representable range.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.last_update_timestamp)
    }

    /// True if `other` describes the same library and version with a later timestamp.
    pub fn is_outdated_by(&self, other: &LibraryDescriptor) -> bool {
        self.name == other.name
            && self.version == other.version
            && other.last_update_timestamp > self.last_update_timestamp
    }
}

/// Text preceding the first `<dependencies>` tag (the whole text if absent).
fn general_part(text: &str) -> &str {
    match text.find(DEPENDENCIES_TAG) {
        Some(pos) => &text[..pos],
        None => text,
    }
}

fn first_capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

impl PartialEq for LibraryDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.last_update_timestamp == other.last_update_timestamp
    }
}

impl Eq for LibraryDescriptor {}

impl Hash for LibraryDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for LibraryDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}-{},t={})", self.name, self.version, self.last_update_timestamp)
    }
}
