//! Property metadata and class declarations.
//!
//! Reflected properties are described by [`PropertyMeta`] records collected
//! into a [`ClassInfo`]. Enumeration-typed integer properties carry an
//! [`Enumerator`] mapping symbolic keys to values.
//!
//! [`Property<T>`] is a small change-detecting cell used for model
//! configuration that must be readable through `&self`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_inspector_core::property::{ClassInfo, Enumerator, PropertyMeta};
//! use horizon_inspector_core::{Value, ValueKind};
//!
//! let mode = Arc::new(Enumerator::new("Mode", [("Off", 0), ("On", 1)]));
//! let class = ClassInfo::new("Lamp")
//!     .property(PropertyMeta::new("mode", ValueKind::Int).with_enumerator(mode), 0)
//!     .property(PropertyMeta::new("watts", ValueKind::Float).read_only(), 60.0);
//!
//! assert_eq!(class.name(), "Lamp");
//! assert_eq!(class.declarations().len(), 2);
//! assert!(class.declarations()[0].meta.is_enum());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::value::{Value, ValueKind};

/// Name of the implicit string property every class declares first.
pub const OBJECT_NAME_PROPERTY: &str = "objectName";

/// An ordered table of symbolic keys for an enumeration-typed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    name: String,
    entries: Vec<(String, i64)>,
}

impl Enumerator {
    /// Create an enumerator from `(key, value)` pairs in declaration order.
    pub fn new<I, K>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        Self {
            name: name.into(),
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// The first key declared for `value`, if any.
    pub fn key_for_value(&self, value: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(k, _)| k.as_str())
    }

    /// The value declared for `key`, if any.
    pub fn value_for_key(&self, key: &str) -> Option<i64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

/// Runtime metadata for a reflected property.
#[derive(Clone, PartialEq)]
pub struct PropertyMeta {
    /// The property name.
    pub name: String,
    /// Declared value kind.
    pub kind: ValueKind,
    /// Whether the property can be written.
    pub writable: bool,
    /// Symbolic keys for enumeration-typed integers.
    pub enumerator: Option<Arc<Enumerator>>,
}

impl PropertyMeta {
    /// Create metadata for a writable property.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            writable: true,
            enumerator: None,
        }
    }

    /// Mark the property read-only.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Attach an enumerator.
    pub fn with_enumerator(mut self, enumerator: Arc<Enumerator>) -> Self {
        self.enumerator = Some(enumerator);
        self
    }

    /// Returns `true` if an enumerator with at least one key is attached.
    pub fn is_enum(&self) -> bool {
        self.enumerator.as_ref().is_some_and(|e| !e.is_empty())
    }
}

impl fmt::Debug for PropertyMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMeta")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("writable", &self.writable)
            .field("enumerator", &self.enumerator.as_ref().map(|e| e.name()))
            .finish()
    }
}

/// A declared property together with the value new instances start with.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub meta: PropertyMeta,
    pub default: Value,
}

/// A class declaration: name, optional superclass and own properties.
///
/// Inherited declarations are resolved by the registry the class is
/// registered with, so a `ClassInfo` only lists what it adds.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    name: String,
    superclass: Option<String>,
    properties: Vec<PropertyDecl>,
}

impl ClassInfo {
    /// Start a class declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            properties: Vec::new(),
        }
    }

    /// Set the superclass by name.
    pub fn inherits(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Declare a property with its default value.
    pub fn property(mut self, meta: PropertyMeta, default: impl Into<Value>) -> Self {
        self.properties.push(PropertyDecl {
            meta,
            default: default.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Properties declared by this class itself, in declaration order.
    pub fn declarations(&self) -> &[PropertyDecl] {
        &self.properties
    }

    /// Names of the properties this class declares, excluding inherited ones.
    pub fn non_inherited_property_names(&self) -> Vec<String> {
        self.properties.iter().map(|d| d.meta.name.clone()).collect()
    }
}

/// A value cell with change detection.
///
/// ```
/// use horizon_inspector_core::property::Property;
///
/// let depth = Property::new(-1);
/// assert!(!depth.set(-1));
/// assert!(depth.set(2));
/// assert_eq!(depth.get(), 2);
/// ```
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.value.read())
            .finish()
    }
}
