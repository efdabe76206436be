//! Single-object projection: one row per property, one value column.

use std::sync::Arc;

use parking_lot::RwLock;

use horizon_inspector_core::{ObjectId, ObjectSubstrate, Value};

use super::address::PropertyAddress;
use super::headers::PropertyHeaders;
use super::index::ModelIndex;
use super::property_model::{CellAddress, PropertyModel};
use super::role::ItemRole;
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation};

#[derive(Default)]
struct ObjectState {
    object: Option<ObjectId>,
    headers: PropertyHeaders,
}

/// Lists the properties of one object as rows.
///
/// Rows are the explicit property names when set (dotted names address
/// descendants), otherwise the declared properties followed by the dynamic
/// ones. The vertical header carries the property labels.
pub struct ObjectPropertyModel {
    substrate: Arc<dyn ObjectSubstrate>,
    state: RwLock<ObjectState>,
    signals: ModelSignals,
}

impl ObjectPropertyModel {
    pub fn new(substrate: Arc<dyn ObjectSubstrate>) -> Self {
        Self {
            substrate,
            state: RwLock::new(ObjectState::default()),
            signals: ModelSignals::new(),
        }
    }

    pub fn object(&self) -> Option<ObjectId> {
        self.state.read().object
    }

    pub fn set_object(&self, object: Option<ObjectId>) {
        self.signals.emit_reset(|| self.state.write().object = object);
    }

    pub fn properties(&self) -> Vec<String> {
        self.state.read().headers.names().to_vec()
    }

    pub fn set_properties(&self, spec: &str) {
        self.signals
            .emit_reset(|| self.state.write().headers.set_properties(spec));
    }

    pub fn add_property(&self, entry: &str) {
        self.signals
            .emit_reset(|| self.state.write().headers.add_property(entry));
    }

    /// Row names: explicit list or reflected properties of the object.
    fn row_names(&self, state: &ObjectState) -> Vec<String> {
        if !state.headers.is_empty() {
            return state.headers.names().to_vec();
        }
        let Some(object) = state.object.filter(|&id| self.substrate.contains(id)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = self
            .substrate
            .properties(object)
            .unwrap_or_default()
            .into_iter()
            .map(|meta| meta.name)
            .collect();
        names.extend(self.substrate.dynamic_property_names(object).unwrap_or_default());
        names
    }
}

impl PropertyModel for ObjectPropertyModel {
    fn substrate(&self) -> &dyn ObjectSubstrate {
        self.substrate.as_ref()
    }

    fn address_at(&self, index: &ModelIndex) -> Option<CellAddress> {
        if !index.is_valid() || index.has_parent() || index.column() != 0 {
            return None;
        }
        let state = self.state.read();
        let object = state.object?;
        let name = self.row_names(&state).into_iter().nth(index.row())?;
        let address = PropertyAddress::parse(&name);
        let owner = address.resolve_owner(self.substrate.as_ref(), object)?;
        Some(CellAddress::property(owner, address.leaf()))
    }
}

impl ItemModel for ObjectPropertyModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() {
            return 0;
        }
        let state = self.state.read();
        self.row_names(&state).len()
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() || self.state.read().object.is_none() {
            0
        } else {
            1
        }
    }

    fn data(&self, index: &ModelIndex, _role: ItemRole) -> Value {
        self.read_property(index)
    }

    fn set_data(&self, index: &ModelIndex, value: Value, role: ItemRole) -> bool {
        role == ItemRole::Edit && self.write_property(index, value)
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        self.property_flags(index)
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if parent.is_valid() || column >= self.column_count(parent) || row >= self.row_count(parent) {
            return ModelIndex::invalid();
        }
        ModelIndex::new(row, column, ModelIndex::invalid())
    }

    fn parent(&self, _index: &ModelIndex) -> ModelIndex {
        ModelIndex::invalid()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> Value {
        if role != ItemRole::Display || orientation != Orientation::Vertical {
            return Value::None;
        }
        let state = self.state.read();
        self.row_names(&state)
            .get(section)
            .map_or(Value::None, |name| Value::from(state.headers.path_label(name)))
    }
}

static_assertions::assert_impl_all!(ObjectPropertyModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_inspector_core::{ClassInfo, PropertyMeta, SharedObjectRegistry, ValueKind};

    fn fixture() -> (Arc<SharedObjectRegistry>, ObjectId) {
        let registry = Arc::new(SharedObjectRegistry::new());
        registry
            .register_class(ClassInfo::new("Light").property(PropertyMeta::new("intensity", ValueKind::Float), 1.0))
            .unwrap();
        let light = registry.create("Light", None).unwrap();
        registry.set_dynamic_property(light, "tag", Value::from("key")).unwrap();
        (registry, light)
    }

    #[test]
    fn test_rows_are_properties() {
        let (registry, light) = fixture();
        let model = ObjectPropertyModel::new(registry.clone());
        assert_eq!(model.column_count(&ModelIndex::invalid()), 0);
        assert_eq!(model.row_count(&ModelIndex::invalid()), 0);

        model.set_object(Some(light));
        assert_eq!(model.column_count(&ModelIndex::invalid()), 1);
        assert_eq!(model.row_count(&ModelIndex::invalid()), 3);
        assert_eq!(model.header_data(2, Orientation::Vertical, ItemRole::Display), Value::from("tag"));
        assert_eq!(model.header_data(0, Orientation::Horizontal, ItemRole::Display), Value::None);

        let intensity = model.index(1, 0, &ModelIndex::invalid());
        assert_eq!(model.data(&intensity, ItemRole::Display), Value::Float(1.0));
        assert!(model.set_data(&intensity, Value::Int(2), ItemRole::Edit));
        assert_eq!(model.data(&intensity, ItemRole::Edit), Value::Float(2.0));
    }

    #[test]
    fn test_explicit_rows_with_labels() {
        let (registry, light) = fixture();
        let bulb = registry.create("Light", Some(light)).unwrap();
        registry.set_object_name(bulb, "bulb").unwrap();

        let model = ObjectPropertyModel::new(registry.clone());
        model.set_object(Some(light));
        model.set_properties("intensity: Intensity, bulb.intensity");
        assert_eq!(model.row_count(&ModelIndex::invalid()), 2);
        assert_eq!(model.header_data(0, Orientation::Vertical, ItemRole::Display), Value::from("Intensity"));
        assert_eq!(model.header_data(1, Orientation::Vertical, ItemRole::Display), Value::from("bulb.Intensity"));
        assert_eq!(model.object_at(&model.index(1, 0, &ModelIndex::invalid())), Some(bulb));
    }
}
