//! Qualified type name utilities.
//!
//! Compiled types are addressed by dotted, fully-qualified names
//! (`def.jquery.JQuery`). Nested types append their declared name to the
//! outer name with a `$` separator (`def.jquery.JQuery$Settings`) and are
//! stored inside their outermost type's file.

use std::path::{Path, PathBuf};

/// Separator between an outer type name and a nested type's declared name.
pub const NESTED_SEPARATOR: char = '$';

/// Simple name of the synthetic per-package descriptor type.
pub const PACKAGE_INFO: &str = "package-info";

/// File extension of a compiled type file.
pub const TYPE_FILE_EXTENSION: &str = "ctype";

/// Text after the last `.`; a nested type keeps its outer prefix (`Outer$Inner`).
pub fn simple_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Declared name of a (possibly nested) type: the last `$` segment of its simple name.
///
/// A leading `$` belongs to the name itself (`$Proxy`), not to a nesting.
pub fn inner_name(name: &str) -> &str {
    let simple = simple_name(name);
    match nesting_separator(simple, true) {
        Some(pos) => &simple[pos + 1..],
        None => simple,
    }
}

/// Simple name with the outer-class prefix stripped at the first `$`.
///
/// `StringTypes$div` becomes `div`; a top-level name is returned unchanged.
pub fn strip_outer_prefix(simple: &str) -> &str {
    match simple.find(NESTED_SEPARATOR) {
        Some(pos) => &simple[pos + 1..],
        None => simple,
    }
}

/// Qualified name of the outermost type enclosing `name` (itself if top-level).
pub fn outermost(name: &str) -> &str {
    let package_len = match name.rfind('.') {
        Some(pos) => pos + 1,
        None => 0,
    };
    match nesting_separator(&name[package_len..], false) {
        Some(pos) => &name[..package_len + pos],
        None => name,
    }
}

/// Position of the first (or `last`) nesting separator in `simple`,
/// ignoring one in leading position.
fn nesting_separator(simple: &str, last: bool) -> Option<usize> {
    let first_len = simple.chars().next().map_or(0, char::len_utf8);
    let rest = &simple[first_len..];
    let pos = if last {
        rest.rfind(NESTED_SEPARATOR)
    } else {
        rest.find(NESTED_SEPARATOR)
    };
    pos.map(|pos| pos + first_len)
}

/// Declared names of the nesting chain below the outermost type.
///
/// `a.Outer$Mid$Leaf` yields `["Mid", "Leaf"]`.
pub fn nesting_chain(name: &str) -> Vec<&str> {
    let outer = outermost(name);
    if outer.len() == name.len() {
        return Vec::new();
    }
    name[outer.len() + 1..]
        .split(NESTED_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Qualified name of a nested type declared as `inner` inside `outer`.
pub fn nested_name(outer: &str, inner: &str) -> String {
    format!("{}{}{}", outer, NESTED_SEPARATOR, inner)
}

/// Qualified name of the package descriptor type for `package`.
pub fn package_info_name(package: &str) -> String {
    if package.is_empty() {
        PACKAGE_INFO.to_string()
    } else {
        format!("{}.{}", package, PACKAGE_INFO)
    }
}

/// Rename `name` if it is `from` or one of its nested types.
///
/// Returns `None` when `name` is unrelated to `from`.
pub fn rebase(name: &str, from: &str, to: &str) -> Option<String> {
    if name == from {
        return Some(to.to_string());
    }
    let rest = name.strip_prefix(from)?;
    if rest.starts_with(NESTED_SEPARATOR) {
        Some(format!("{}{}", to, rest))
    } else {
        None
    }
}

/// Archive entry path (always `/`-separated) of the file holding `name`.
pub fn type_entry_path(name: &str) -> String {
    let outer = outermost(name);
    format!("{}.{}", outer.replace('.', "/"), TYPE_FILE_EXTENSION)
}

/// Relative filesystem path of the file holding `name`.
pub fn type_file_path(name: &str) -> PathBuf {
    let outer = outermost(name);
    let mut path: PathBuf = outer.split('.').collect();
    path.set_extension(TYPE_FILE_EXTENSION);
    path
}

/// Qualified type name for a `/`-separated entry path, if it is a type file.
pub fn type_name_from_entry_path(path: &str) -> Option<String> {
    let stem = path
        .trim_start_matches('/')
        .strip_suffix(TYPE_FILE_EXTENSION)?
        .strip_suffix('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.replace('/', "."))
}

/// Dotted package name of `dir` relative to `root`.
///
/// Returns `None` if `dir` is not below `root`; `root` itself maps to the
/// unnamed package.
pub fn package_name_for_dir(root: &Path, dir: &Path) -> Option<String> {
    let relative = dir.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("."))
}
