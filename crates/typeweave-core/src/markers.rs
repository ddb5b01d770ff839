//! Marker reader.
//!
//! Marker types are resolved through a [`MarkerLoader`]: a name -> definition
//! table filled strictly from the candidate classpath. Several modules may
//! each define a marker type with the same qualified name; the loader never
//! lets such a name resolve against the host's own definition unless no
//! candidate module defines it.
//!
//! Reading is silent on absence. A package or type without the requested
//! marker is the normal case, so [`MarkerReader::read_marker`] returns `None`
//! without logging; only failures while resolving a property are warned about.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};

use typeweave_store::SymbolStore;
use typeweave_types::{CompiledType, FromMarkerValue, Marker, TypeKind, WeaveError};

/// Non-delegating marker definition table.
pub struct MarkerLoader<'a> {
    candidates: &'a dyn SymbolStore,
    host: HashMap<String, Arc<CompiledType>>,
    table: RwLock<HashMap<String, Arc<CompiledType>>>,
}

impl<'a> MarkerLoader<'a> {
    pub fn new(candidates: &'a dyn SymbolStore) -> Self {
        Self {
            candidates,
            host: HashMap::new(),
            table: RwLock::new(HashMap::new()),
        }
    }

    /// Register last-resort host definitions.
    pub fn with_host_definitions<I>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = CompiledType>,
    {
        for def in definitions {
            self.host.insert(def.name.clone(), Arc::new(def));
        }
        self
    }

    /// Resolve a marker type definition.
    pub fn definition(&self, name: &str) -> Result<Arc<CompiledType>, WeaveError> {
        if let Some(def) = self.table.read().get(name) {
            return Ok(def.clone());
        }

        let def = match self.candidates.load(name) {
            Ok(def) => Arc::new(def),
            Err(e) if e.is_not_found() => self
                .host
                .get(name)
                .cloned()
                .ok_or_else(|| WeaveError::not_found(name))?,
            Err(e) => return Err(e),
        };
        if def.kind != TypeKind::Marker {
            return Err(WeaveError::malformed(
                name,
                format!("{:?} type is not a marker type", def.kind),
            ));
        }

        self.table.write().insert(name.to_string(), def.clone());
        Ok(def)
    }
}

/// A marker found on an element, paired with its resolved definition.
#[derive(Debug, Clone)]
pub struct MarkerInstance<'e> {
    pub marker: &'e Marker,
    pub definition: Arc<CompiledType>,
}

impl MarkerInstance<'_> {
    pub fn type_name(&self) -> &str {
        &self.marker.type_name
    }
}

pub struct MarkerReader<'a> {
    loader: MarkerLoader<'a>,
}

impl<'a> MarkerReader<'a> {
    pub fn new(loader: MarkerLoader<'a>) -> Self {
        Self { loader }
    }

    /// Marker `marker_name` attached to `element`, if any.
    ///
    /// The marker type must be resolvable; if it is not, an error is logged
    /// and `None` is returned.
    pub fn read_marker<'e>(
        &self,
        element: &'e CompiledType,
        marker_name: &str,
    ) -> Option<MarkerInstance<'e>> {
        let definition = match self.loader.definition(marker_name) {
            Ok(def) => def,
            Err(e) => {
                error!(marker = %marker_name, error = %e, "cannot load marker type");
                return None;
            }
        };
        element.marker(marker_name).map(|marker| MarkerInstance { marker, definition })
    }

    /// Typed value of `property`: the explicit instance value, or the accessor's
    /// default. Any failure is logged as a warning and yields `None`.
    pub fn get_property<T: FromMarkerValue>(
        &self,
        instance: &MarkerInstance<'_>,
        property: &str,
    ) -> Option<T> {
        match Self::resolve_property(instance, property) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    marker = %instance.type_name(),
                    property = %property,
                    error = %e,
                    "cannot read marker property"
                );
                None
            }
        }
    }

    fn resolve_property<T: FromMarkerValue>(
        instance: &MarkerInstance<'_>,
        property: &str,
    ) -> Result<T, WeaveError> {
        let context = format!("{}.{}", instance.type_name(), property);
        let accessor = instance
            .definition
            .declared_method(property)
            .filter(|m| m.signature.params.is_empty())
            .ok_or_else(|| WeaveError::not_found(&context))?;
        let value = instance
            .marker
            .values
            .get(property)
            .or(accessor.marker_default.as_ref())
            .ok_or_else(|| WeaveError::malformed(&context, "no value and no default"))?;
        T::from_marker_value(value).ok_or_else(|| {
            WeaveError::malformed(
                &context,
                format!("expected {}, found {}", T::expected(), value.kind_name()),
            )
        })
    }
}
