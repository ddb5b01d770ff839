//! Declarative markers attached to compiled types.
//!
//! A marker instance names its marker type and carries explicit property
//! values. The marker type is itself a compiled type whose accessor methods
//! declare the available properties and their defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A property value stored in a marker instance or accessor default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerValue {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Reference to a compiled type by qualified name
    TypeRef(String),
    Array(Vec<MarkerValue>),
}

impl MarkerValue {
    /// Short label of the value's shape, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MarkerValue::Bool(_) => "bool",
            MarkerValue::Int(_) => "int",
            MarkerValue::Str(_) => "string",
            MarkerValue::TypeRef(_) => "type",
            MarkerValue::Array(_) => "array",
        }
    }

    pub fn type_ref(name: impl Into<String>) -> Self {
        MarkerValue::TypeRef(name.into())
    }

    pub fn type_refs<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MarkerValue::Array(names.into_iter().map(|n| MarkerValue::TypeRef(n.into())).collect())
    }

    /// Rename type references equal to `from` (or nested below it) to `to`.
    pub fn rebind(&self, from: &str, to: &str) -> MarkerValue {
        match self {
            MarkerValue::TypeRef(name) => MarkerValue::TypeRef(
                crate::names::rebase(name, from, to).unwrap_or_else(|| name.clone()),
            ),
            MarkerValue::Array(items) => {
                MarkerValue::Array(items.iter().map(|v| v.rebind(from, to)).collect())
            }
            other => other.clone(),
        }
    }
}

/// A marker instance attached to a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Qualified name of the marker type
    pub type_name: String,
    /// Explicitly supplied property values
    pub values: BTreeMap<String, MarkerValue>,
}

impl Marker {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, property: impl Into<String>, value: MarkerValue) -> Self {
        self.values.insert(property.into(), value);
        self
    }
}

/// A resolved reference to a compiled type, as read from a marker property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conversion from a marker property value into a typed Rust value.
pub trait FromMarkerValue: Sized {
    /// Shape expected by this conversion, for diagnostics.
    fn expected() -> &'static str;

    fn from_marker_value(value: &MarkerValue) -> Option<Self>;
}

impl FromMarkerValue for bool {
    fn expected() -> &'static str {
        "bool"
    }

    fn from_marker_value(value: &MarkerValue) -> Option<Self> {
        match value {
            MarkerValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromMarkerValue for i64 {
    fn expected() -> &'static str {
        "int"
    }

    fn from_marker_value(value: &MarkerValue) -> Option<Self> {
        match value {
            MarkerValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromMarkerValue for String {
    fn expected() -> &'static str {
        "string"
    }

    fn from_marker_value(value: &MarkerValue) -> Option<Self> {
        match value {
            MarkerValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromMarkerValue for TypeRef {
    fn expected() -> &'static str {
        "type"
    }

    fn from_marker_value(value: &MarkerValue) -> Option<Self> {
        match value {
            MarkerValue::TypeRef(name) => Some(TypeRef(name.clone())),
            _ => None,
        }
    }
}

impl<T: FromMarkerValue> FromMarkerValue for Vec<T> {
    fn expected() -> &'static str {
        "array"
    }

    fn from_marker_value(value: &MarkerValue) -> Option<Self> {
        match value {
            MarkerValue::Array(items) => items.iter().map(T::from_marker_value).collect(),
            _ => None,
        }
    }
}
