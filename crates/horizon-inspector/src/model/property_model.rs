//! The shared contract of every property projection.
//!
//! A projection only has to say which object and which property a cell
//! addresses ([`PropertyModel::address_at`]). Reading, writing and flag
//! computation are implemented once here on top of the
//! [`ObjectSubstrate`].

use horizon_inspector_core::{ObjectId, ObjectSubstrate, PropertyMeta, Value};

use super::index::ModelIndex;
use super::targets;
use super::traits::{ItemFlags, ItemModel};

/// The object and property a cell resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAddress {
    pub object: ObjectId,
    /// `None` when the cell stands for the object itself, or when the
    /// column lies beyond the object's own properties.
    pub property: Option<String>,
}

impl CellAddress {
    pub fn object(object: ObjectId) -> Self {
        Self {
            object,
            property: None,
        }
    }

    pub fn property(object: ObjectId, name: impl Into<String>) -> Self {
        Self {
            object,
            property: Some(name.into()),
        }
    }
}

/// Returns `true` if `name` is one of the object's dynamic properties.
pub fn is_dynamic_property(substrate: &dyn ObjectSubstrate, object: ObjectId, name: &str) -> bool {
    substrate
        .dynamic_property_names(object)
        .is_ok_and(|names| names.iter().any(|n| n == name))
}

/// A model whose cells address properties of objects.
pub trait PropertyModel: ItemModel {
    /// The object store cells are resolved against.
    fn substrate(&self) -> &dyn ObjectSubstrate;

    /// Resolve a cell. `None` when the cell addresses no object.
    fn address_at(&self, index: &ModelIndex) -> Option<CellAddress>;

    /// The object a cell resolves to.
    fn object_at(&self, index: &ModelIndex) -> Option<ObjectId> {
        self.address_at(index).map(|address| address.object)
    }

    /// The property name a cell resolves to.
    fn property_name_at(&self, index: &ModelIndex) -> Option<String> {
        self.address_at(index)
            .and_then(|address| address.property)
            .filter(|name| !name.is_empty())
    }

    /// Declared metadata of the addressed property. `None` for dynamic
    /// properties and unresolved cells.
    fn property_meta_at(&self, index: &ModelIndex) -> Option<PropertyMeta> {
        let CellAddress {
            object,
            property: Some(name),
        } = self.address_at(index)?
        else {
            return None;
        };
        self.substrate().property_meta(object, &name).ok().flatten()
    }

    /// Current value of the addressed property, or `Value::None`.
    fn read_property(&self, index: &ModelIndex) -> Value {
        let Some(CellAddress {
            object,
            property: Some(name),
        }) = self.address_at(index)
        else {
            return Value::None;
        };
        if name.is_empty() {
            return Value::None;
        }
        self.substrate().property(object, &name).unwrap_or_default()
    }

    /// Write the addressed property.
    ///
    /// A write the substrate reports as failed still counts as success when
    /// the property is one of the object's dynamic properties. `data_changed`
    /// is emitted only when the stored value actually changed.
    fn write_property(&self, index: &ModelIndex, value: Value) -> bool {
        let Some(CellAddress {
            object,
            property: Some(name),
        }) = self.address_at(index)
        else {
            return false;
        };
        if name.is_empty() {
            return false;
        }

        let substrate = self.substrate();
        let before = substrate.property(object, &name).unwrap_or_default();
        let accepted = match substrate.set_property(object, &name, value) {
            Ok(true) => true,
            Ok(false) => is_dynamic_property(substrate, object, &name),
            Err(err) => {
                tracing::debug!(target: targets::MODEL, ?object, property = %name, %err, "property write failed");
                false
            }
        };

        if accepted && substrate.property(object, &name).unwrap_or_default() != before {
            self.signals().emit_data_changed_single(index.clone());
        }
        accepted
    }

    /// Enabled and selectable when the cell resolves to an object; editable
    /// when the property is declared writable or is dynamic.
    fn property_flags(&self, index: &ModelIndex) -> ItemFlags {
        let Some(address) = self.address_at(index) else {
            return ItemFlags::disabled();
        };
        if !self.substrate().contains(address.object) {
            return ItemFlags::disabled();
        }
        let editable = address.property.is_some_and(|name| {
            self.substrate()
                .property_meta(address.object, &name)
                .ok()
                .flatten()
                .is_some_and(|meta| meta.writable)
                || is_dynamic_property(self.substrate(), address.object, &name)
        });
        ItemFlags::new().with_editable(editable)
    }
}
