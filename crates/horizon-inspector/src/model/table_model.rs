//! Flat projection of a homogeneous list of objects.
//!
//! Rows are objects in list order. Columns are either an explicit, ordered
//! list of (possibly dotted) property names, or the declared properties of
//! the first object followed by its dynamic properties.
//!
//! Rows can be inserted through an injected creator, removed, and moved.
//! After a structural change the sibling order of the row objects inside
//! their parents is brought back in line with the row order through
//! [`ObjectSubstrate::set_child_order`].

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use horizon_inspector_core::{ObjectId, ObjectResult, ObjectSubstrate, Value};

use super::address::PropertyAddress;
use super::headers::PropertyHeaders;
use super::index::ModelIndex;
use super::property_model::{CellAddress, PropertyModel};
use super::role::ItemRole;
use super::targets;
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation};

/// Creates the object backing a new row.
pub type ObjectCreator = Arc<dyn Fn(&dyn ObjectSubstrate) -> ObjectResult<ObjectId> + Send + Sync>;

/// Disposes of the object backing a removed row.
pub type ObjectDestructor = Arc<dyn Fn(&dyn ObjectSubstrate, ObjectId) -> ObjectResult<()> + Send + Sync>;

#[derive(Default)]
struct TableState {
    objects: Vec<ObjectId>,
    headers: PropertyHeaders,
    creator: Option<ObjectCreator>,
    destructor: Option<ObjectDestructor>,
    structural_owner: Option<ObjectId>,
}

/// Builder for [`ObjectTableModel`].
pub struct ObjectTableModelBuilder {
    substrate: Arc<dyn ObjectSubstrate>,
    state: TableState,
}

impl ObjectTableModelBuilder {
    /// Initial row objects.
    pub fn objects(mut self, objects: impl IntoIterator<Item = ObjectId>) -> Self {
        self.state.objects = objects.into_iter().collect();
        self
    }

    /// Explicit columns in the form `"name: header, child.name, ..."`.
    pub fn properties(mut self, spec: &str) -> Self {
        self.state.headers.set_properties(spec);
        self
    }

    /// Enables row insertion.
    pub fn creator<F>(mut self, creator: F) -> Self
    where
        F: Fn(&dyn ObjectSubstrate) -> ObjectResult<ObjectId> + Send + Sync + 'static,
    {
        self.state.creator = Some(Arc::new(creator));
        self
    }

    /// Replaces [`ObjectSubstrate::destroy`] for removed rows.
    pub fn destructor<F>(mut self, destructor: F) -> Self
    where
        F: Fn(&dyn ObjectSubstrate, ObjectId) -> ObjectResult<()> + Send + Sync + 'static,
    {
        self.state.destructor = Some(Arc::new(destructor));
        self
    }

    /// Parent that newly created row objects are attached to.
    pub fn structural_owner(mut self, owner: ObjectId) -> Self {
        self.state.structural_owner = Some(owner);
        self
    }

    pub fn build(self) -> ObjectTableModel {
        ObjectTableModel {
            substrate: self.substrate,
            state: RwLock::new(self.state),
            signals: ModelSignals::new(),
        }
    }
}

/// A table whose rows are objects and whose columns are properties.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_inspector::model::{ItemModel, ItemRole, ModelIndex, ObjectTableModel, Orientation};
/// use horizon_inspector_core::{ClassInfo, PropertyMeta, SharedObjectRegistry, Value, ValueKind};
///
/// let registry = Arc::new(SharedObjectRegistry::new());
/// registry
///     .register_class(ClassInfo::new("Item").property(PropertyMeta::new("count", ValueKind::Int), 3))
///     .unwrap();
/// let items = [registry.create("Item", None).unwrap(), registry.create("Item", None).unwrap()];
///
/// let model = ObjectTableModel::builder(registry.clone())
///     .objects(items)
///     .properties("count: Count")
///     .build();
///
/// assert_eq!(model.row_count(&ModelIndex::invalid()), 2);
/// assert_eq!(model.column_count(&ModelIndex::invalid()), 1);
/// let cell = model.index(1, 0, &ModelIndex::invalid());
/// assert_eq!(model.data(&cell, ItemRole::Display), Value::Int(3));
/// assert_eq!(model.header_data(0, Orientation::Horizontal, ItemRole::Display), Value::from("Count"));
/// ```
pub struct ObjectTableModel {
    substrate: Arc<dyn ObjectSubstrate>,
    state: RwLock<TableState>,
    signals: ModelSignals,
}

impl ObjectTableModel {
    pub fn new(substrate: Arc<dyn ObjectSubstrate>) -> Self {
        Self::builder(substrate).build()
    }

    pub fn builder(substrate: Arc<dyn ObjectSubstrate>) -> ObjectTableModelBuilder {
        ObjectTableModelBuilder {
            substrate,
            state: TableState::default(),
        }
    }

    /// Row objects in row order.
    pub fn objects(&self) -> Vec<ObjectId> {
        self.state.read().objects.clone()
    }

    pub fn set_objects(&self, objects: impl IntoIterator<Item = ObjectId>) {
        let objects: Vec<ObjectId> = objects.into_iter().collect();
        self.signals.emit_reset(|| self.state.write().objects = objects);
    }

    /// Show the direct children of `parent` whose type is `class`, and
    /// create new rows as `class` instances under `parent`.
    pub fn set_child_objects(&self, parent: ObjectId, class: &str) {
        let substrate = self.substrate.as_ref();
        let objects: Vec<ObjectId> = substrate
            .children(parent)
            .unwrap_or_default()
            .into_iter()
            .filter(|&child| substrate.type_name(child).is_ok_and(|name| name == class))
            .collect();
        let class = class.to_string();
        let creator: ObjectCreator =
            Arc::new(move |substrate: &dyn ObjectSubstrate| substrate.create_object(&class, Some(parent)));
        self.signals.emit_reset(|| {
            let mut state = self.state.write();
            state.objects = objects;
            state.creator = Some(creator);
        });
    }

    pub fn set_creator<F>(&self, creator: F)
    where
        F: Fn(&dyn ObjectSubstrate) -> ObjectResult<ObjectId> + Send + Sync + 'static,
    {
        self.state.write().creator = Some(Arc::new(creator));
    }

    pub fn clear_creator(&self) {
        self.state.write().creator = None;
    }

    pub fn has_creator(&self) -> bool {
        self.state.read().creator.is_some()
    }

    pub fn set_structural_owner(&self, owner: Option<ObjectId>) {
        self.state.write().structural_owner = owner;
    }

    pub fn structural_owner(&self) -> Option<ObjectId> {
        self.state.read().structural_owner
    }

    /// Explicit column names. Empty when columns follow the first object.
    pub fn properties(&self) -> Vec<String> {
        self.state.read().headers.names().to_vec()
    }

    /// Replace the explicit columns from `"name: header, ..."`.
    pub fn set_properties(&self, spec: &str) {
        self.signals
            .emit_reset(|| self.state.write().headers.set_properties(spec));
    }

    /// Append one explicit column, `"name"` or `"name: header"`.
    pub fn add_property(&self, entry: &str) {
        self.signals
            .emit_reset(|| self.state.write().headers.add_property(entry));
    }

    /// Append one row.
    pub fn append_row(&self) -> bool {
        let rows = self.row_count(&ModelIndex::invalid());
        self.insert_rows(rows, 1, &ModelIndex::invalid())
    }

    /// Insert as many rows as are selected, in front of the first selected
    /// row.
    pub fn insert_rows_at_selection(&self, selected_rows: &[usize]) -> bool {
        let Some(&first) = selected_rows.iter().min() else {
            return false;
        };
        self.insert_rows(first, selected_rows.len(), &ModelIndex::invalid())
    }

    /// Remove every selected row, last row first.
    pub fn remove_selected_rows(&self, selected_rows: &[usize]) -> bool {
        let mut rows = selected_rows.to_vec();
        rows.sort_unstable();
        rows.dedup();
        let mut removed = false;
        for row in rows.into_iter().rev() {
            removed |= self.remove_rows(row, 1, &ModelIndex::invalid());
        }
        removed
    }

    /// Move the row at `from` so that it lands at `to`.
    pub fn move_row(&self, from: usize, to: usize) -> bool {
        self.move_rows(&ModelIndex::invalid(), from, 1, &ModelIndex::invalid(), to)
    }

    /// Bring the sibling order of row objects from `first_row` on in line
    /// with the row order.
    ///
    /// Within each parent, the affected row objects are moved behind their
    /// remaining siblings, in row order.
    #[tracing::instrument(skip(self), target = "horizon_inspector::model::table", level = "trace")]
    pub fn reorder_to_match_row_order(&self, first_row: usize) {
        let tail: Vec<ObjectId> = self.state.read().objects.iter().skip(first_row).copied().collect();
        let substrate = self.substrate.as_ref();

        let mut by_parent: Vec<(ObjectId, Vec<ObjectId>)> = Vec::new();
        for object in tail {
            let Ok(Some(parent)) = substrate.parent(object) else {
                continue;
            };
            match by_parent.iter_mut().find(|(p, _)| *p == parent) {
                Some((_, moved)) => moved.push(object),
                None => by_parent.push((parent, vec![object])),
            }
        }

        for (parent, moved) in by_parent {
            let Ok(children) = substrate.children(parent) else {
                continue;
            };
            let mut order: Vec<ObjectId> = children.into_iter().filter(|c| !moved.contains(c)).collect();
            order.extend(moved);
            if let Err(err) = substrate.set_child_order(parent, &order) {
                tracing::debug!(target: targets::TABLE, ?parent, %err, "failed to reorder children");
            }
        }
    }

    fn schema_column_count(&self, state: &TableState) -> usize {
        if !state.headers.is_empty() {
            return state.headers.names().len();
        }
        let Some(&first) = state.objects.first() else {
            return 0;
        };
        let declared = self.substrate.properties(first).map_or(0, |p| p.len());
        let dynamic = self.substrate.dynamic_property_names(first).map_or(0, |d| d.len());
        declared + dynamic
    }

    /// Name of implicit column `column` on `object`: declared properties
    /// first, then dynamic ones.
    fn implicit_column_name(&self, object: ObjectId, column: usize) -> Option<String> {
        let declared = self.substrate.properties(object).ok()?;
        if let Some(meta) = declared.get(column) {
            return Some(meta.name.clone());
        }
        self.substrate
            .dynamic_property_names(object)
            .ok()?
            .into_iter()
            .nth(column - declared.len())
    }

    fn destroy_removed(&self, destructor: Option<ObjectDestructor>, removed: Vec<ObjectId>) {
        for object in removed {
            let result = match &destructor {
                Some(destructor) => destructor(self.substrate.as_ref(), object),
                None => self.substrate.destroy(object),
            };
            if let Err(err) = result {
                tracing::debug!(target: targets::TABLE, ?object, %err, "failed to destroy removed row object");
            }
        }
    }
}

impl fmt::Debug for ObjectTableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("ObjectTableModel")
            .field("objects", &state.objects)
            .field("headers", &state.headers)
            .field("has_creator", &state.creator.is_some())
            .field("structural_owner", &state.structural_owner)
            .finish()
    }
}

impl PropertyModel for ObjectTableModel {
    fn substrate(&self) -> &dyn ObjectSubstrate {
        self.substrate.as_ref()
    }

    fn address_at(&self, index: &ModelIndex) -> Option<CellAddress> {
        if !index.is_valid() || index.has_parent() {
            return None;
        }
        let state = self.state.read();
        let row_object = *state.objects.get(index.row())?;
        if !self.substrate.contains(row_object) {
            return None;
        }

        if let Some(name) = state.headers.name_at(index.column()) {
            let address = PropertyAddress::parse(name);
            let owner = address.resolve_owner(self.substrate.as_ref(), row_object)?;
            return Some(CellAddress::property(owner, address.leaf()));
        }
        if !state.headers.is_empty() || index.column() >= self.schema_column_count(&state) {
            return None;
        }
        // Columns past this row's own dynamic properties address no property.
        Some(CellAddress {
            object: row_object,
            property: self.implicit_column_name(row_object, index.column()),
        })
    }
}

impl ItemModel for ObjectTableModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() {
            return 0;
        }
        self.state.read().objects.len()
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        if parent.is_valid() {
            return 0;
        }
        let state = self.state.read();
        self.schema_column_count(&state)
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
        if parent.is_valid() {
            return ModelIndex::invalid();
        }
        let state = self.state.read();
        if row >= state.objects.len() || column >= self.schema_column_count(&state) {
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
        if role != ItemRole::Display {
            return Value::None;
        }
        match orientation {
            Orientation::Vertical => Value::Int(section as i64),
            Orientation::Horizontal => {
                let state = self.state.read();
                if let Some(name) = state.headers.name_at(section) {
                    return Value::from(state.headers.path_label(name));
                }
                if !state.headers.is_empty() {
                    return Value::None;
                }
                state
                    .objects
                    .first()
                    .and_then(|&first| self.implicit_column_name(first, section))
                    .map_or(Value::None, |name| Value::from(state.headers.label(&name)))
            }
        }
    }

    #[tracing::instrument(skip(self, parent), target = "horizon_inspector::model::table", level = "trace")]
    fn insert_rows(&self, row: usize, count: usize, parent: &ModelIndex) -> bool {
        if parent.is_valid() || count == 0 {
            return false;
        }
        let (creator, owner, schema_changes) = {
            let state = self.state.read();
            let len = state.objects.len();
            if row > len || len.checked_add(count).is_none_or(|total| total > isize::MAX as usize) {
                return false;
            }
            let Some(creator) = state.creator.clone() else {
                tracing::debug!(target: targets::TABLE, "insert without an object creator");
                return false;
            };
            (
                creator,
                state.structural_owner,
                state.objects.is_empty() && state.headers.is_empty(),
            )
        };

        let substrate = self.substrate.as_ref();
        let mut created = Vec::new();
        for _ in 0..count {
            match creator(substrate) {
                Ok(object) => created.push(object),
                Err(err) => {
                    tracing::debug!(target: targets::TABLE, %err, "object creator failed");
                    for object in created {
                        if let Err(err) = substrate.destroy(object) {
                            tracing::debug!(target: targets::TABLE, ?object, %err, "failed to roll back created row object");
                        }
                    }
                    return false;
                }
            }
        }
        if let Some(owner) = owner {
            for &object in &created {
                if let Err(err) = substrate.set_parent(object, Some(owner)) {
                    tracing::debug!(target: targets::TABLE, ?object, %err, "failed to attach to structural owner");
                }
            }
        }

        let rows = self
            .signals
            .emit_rows_inserted(ModelIndex::invalid(), row, row + count - 1, || {
                let mut state = self.state.write();
                state.objects.splice(row..row, created);
                state.objects.len()
            });

        if row + count < rows {
            self.reorder_to_match_row_order(row + count);
        }
        if schema_changes {
            self.signals.emit_reset(|| ());
        }
        self.signals.row_count_changed.emit(rows);
        true
    }

    #[tracing::instrument(skip(self, parent), target = "horizon_inspector::model::table", level = "trace")]
    fn remove_rows(&self, row: usize, count: usize, parent: &ModelIndex) -> bool {
        if parent.is_valid() || count == 0 {
            return false;
        }
        let destructor = {
            let state = self.state.read();
            if row.checked_add(count).is_none_or(|end| end > state.objects.len()) {
                return false;
            }
            state.destructor.clone()
        };

        let (rows, schema_changes) =
            self.signals
                .emit_rows_removed(ModelIndex::invalid(), row, row + count - 1, || {
                    let mut state = self.state.write();
                    let removed: Vec<ObjectId> = state.objects.drain(row..row + count).collect();
                    let rows = state.objects.len();
                    let schema_changes = rows == 0 && state.headers.is_empty();
                    drop(state);
                    self.destroy_removed(destructor, removed);
                    (rows, schema_changes)
                });

        if schema_changes {
            self.signals.emit_reset(|| ());
        }
        self.signals.row_count_changed.emit(rows);
        true
    }

    /// Moves are reported as a reset.
    #[tracing::instrument(
        skip(self, source_parent, destination_parent),
        target = "horizon_inspector::model::table",
        level = "trace"
    )]
    fn move_rows(
        &self,
        source_parent: &ModelIndex,
        source_row: usize,
        count: usize,
        destination_parent: &ModelIndex,
        destination_row: usize,
    ) -> bool {
        if source_parent.is_valid() || destination_parent.is_valid() || count == 0 {
            return false;
        }
        {
            let state = self.state.read();
            if source_row.checked_add(count).is_none_or(|end| end > state.objects.len())
                || destination_row > state.objects.len()
            {
                return false;
            }
        }

        self.signals.emit_reset(|| {
            let mut state = self.state.write();
            let moving: Vec<ObjectId> = state.objects.drain(source_row..source_row + count).collect();
            for (offset, object) in moving.into_iter().enumerate() {
                let at = (destination_row + offset).min(state.objects.len());
                state.objects.insert(at, object);
            }
        });
        self.reorder_to_match_row_order(source_row.min(destination_row));
        self.signals.row_order_changed.emit(());
        true
    }
}

static_assertions::assert_impl_all!(ObjectTableModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_inspector_core::{ClassInfo, PropertyMeta, SharedObjectRegistry, ValueKind};
    use parking_lot::Mutex;

    fn registry() -> Arc<SharedObjectRegistry> {
        let registry = Arc::new(SharedObjectRegistry::new());
        registry
            .register_class(
                ClassInfo::new("Item")
                    .property(PropertyMeta::new("count", ValueKind::Int), 0)
                    .property(PropertyMeta::new("id", ValueKind::Int).read_only(), 0),
            )
            .unwrap();
        registry.register_class(ClassInfo::new("Holder")).unwrap();
        registry
    }

    fn named_items(registry: &SharedObjectRegistry, parent: ObjectId, n: usize) -> Vec<ObjectId> {
        (0..n)
            .map(|i| {
                let item = registry.create("Item", Some(parent)).unwrap();
                registry.set_object_name(item, &format!("item{i}")).unwrap();
                item
            })
            .collect()
    }

    #[test]
    fn test_implicit_columns_follow_first_object() {
        let registry = registry();
        let a = registry.create("Item", None).unwrap();
        let b = registry.create("Item", None).unwrap();
        registry.set_dynamic_property(a, "flag", Value::Bool(true)).unwrap();

        let model = ObjectTableModel::builder(registry.clone()).objects([a, b]).build();
        // objectName, count, id, flag
        assert_eq!(model.column_count(&ModelIndex::invalid()), 4);
        assert_eq!(model.header_data(3, Orientation::Horizontal, ItemRole::Display), Value::from("flag"));

        let b_flag = model.index(1, 3, &ModelIndex::invalid());
        assert!(b_flag.is_valid());
        assert_eq!(model.data(&b_flag, ItemRole::Display), Value::None);
        assert_eq!(model.property_name_at(&b_flag), None);
        assert!(!model.flags(&b_flag).editable);
        assert!(model.flags(&b_flag).enabled);
    }

    #[test]
    fn test_flags_follow_writability() {
        let registry = registry();
        let a = registry.create("Item", None).unwrap();
        let model = ObjectTableModel::builder(registry.clone())
            .objects([a])
            .properties("count, id")
            .build();
        assert!(model.flags(&model.index(0, 0, &ModelIndex::invalid())).editable);
        assert!(!model.flags(&model.index(0, 1, &ModelIndex::invalid())).editable);
        assert!(!model.set_data(&model.index(0, 1, &ModelIndex::invalid()), Value::Int(9), ItemRole::Edit));
    }

    #[test]
    fn test_dotted_column() {
        let registry = registry();
        let row = registry.create("Holder", None).unwrap();
        let part = registry.create("Item", Some(row)).unwrap();
        registry.set_object_name(part, "part").unwrap();
        registry.set_property(part, "count", Value::Int(7)).unwrap();
        let bare = registry.create("Holder", None).unwrap();

        let model = ObjectTableModel::builder(registry.clone())
            .objects([row, bare])
            .properties("part.count")
            .build();
        assert_eq!(model.header_data(0, Orientation::Horizontal, ItemRole::Display), Value::from("part.count"));
        let cell = model.index(0, 0, &ModelIndex::invalid());
        assert_eq!(model.object_at(&cell), Some(part));
        assert_eq!(model.data(&cell, ItemRole::Display), Value::Int(7));
        let missing = model.index(1, 0, &ModelIndex::invalid());
        assert_eq!(model.object_at(&missing), None);
        assert_eq!(model.flags(&missing), ItemFlags::disabled());
    }

    #[test]
    fn test_vertical_header_is_row_number() {
        let registry = registry();
        let model = ObjectTableModel::new(registry);
        assert_eq!(model.header_data(4, Orientation::Vertical, ItemRole::Display), Value::Int(4));
    }

    #[test]
    fn test_insert_with_structural_owner_keeps_sibling_order() {
        let registry = registry();
        let owner = registry.create("Holder", None).unwrap();
        let items = named_items(&registry, owner, 3);
        let model = ObjectTableModel::builder(registry.clone())
            .objects(items.clone())
            .creator(|substrate: &dyn ObjectSubstrate| substrate.create_object("Item", None))
            .structural_owner(owner)
            .build();

        assert!(model.insert_rows(1, 2, &ModelIndex::invalid()));
        let objects = model.objects();
        assert_eq!(objects.len(), 5);
        assert_eq!(objects[0], items[0]);
        assert_eq!(objects[3..], items[1..]);
        assert_eq!(registry.children(owner).unwrap(), objects);
    }

    #[test]
    fn test_remove_destroys_objects() {
        let registry = registry();
        let owner = registry.create("Holder", None).unwrap();
        let items = named_items(&registry, owner, 3);
        let model = ObjectTableModel::builder(registry.clone()).objects(items.clone()).build();

        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = counts.clone();
        model.signals().row_count_changed.connect(move |rows| sink.lock().push(*rows));

        assert!(model.remove_rows(0, 2, &ModelIndex::invalid()));
        assert_eq!(model.objects(), [items[2]]);
        assert!(!registry.contains(items[0]));
        assert!(!registry.contains(items[1]));
        assert_eq!(*counts.lock(), [1]);
        assert!(!model.remove_rows(1, 1, &ModelIndex::invalid()));
    }

    #[test]
    fn test_custom_destructor() {
        let registry = registry();
        let item = registry.create("Item", None).unwrap();
        let released = Arc::new(Mutex::new(Vec::new()));
        let sink = released.clone();
        let model = ObjectTableModel::builder(registry.clone())
            .objects([item])
            .destructor(move |_: &dyn ObjectSubstrate, id| {
                sink.lock().push(id);
                Ok(())
            })
            .build();
        assert!(model.remove_rows(0, 1, &ModelIndex::invalid()));
        assert!(registry.contains(item));
        assert_eq!(*released.lock(), [item]);
    }

    #[test]
    fn test_row_actions() {
        let registry = registry();
        let owner = registry.create("Holder", None).unwrap();
        named_items(&registry, owner, 2);
        let model = ObjectTableModel::new(registry.clone());
        model.set_child_objects(owner, "Item");
        assert!(model.has_creator());

        assert!(model.append_row());
        assert_eq!(model.row_count(&ModelIndex::invalid()), 3);
        assert!(model.insert_rows_at_selection(&[2, 0]));
        assert_eq!(model.row_count(&ModelIndex::invalid()), 5);
        assert!(!model.insert_rows_at_selection(&[]));

        let before = model.objects();
        assert!(model.remove_selected_rows(&[4, 1]));
        assert_eq!(model.objects(), [before[0], before[2], before[3]]);
        assert_eq!(registry.children(owner).unwrap(), model.objects());
    }

    #[test]
    fn test_move_row_syncs_siblings() {
        let registry = registry();
        let owner = registry.create("Holder", None).unwrap();
        let items = named_items(&registry, owner, 3);
        let model = ObjectTableModel::builder(registry.clone()).objects(items.clone()).build();

        let order_changes = Arc::new(Mutex::new(0));
        let sink = order_changes.clone();
        model.signals().row_order_changed.connect(move |_| *sink.lock() += 1);

        assert!(model.move_row(2, 0));
        assert_eq!(model.objects(), [items[2], items[0], items[1]]);
        assert_eq!(registry.children(owner).unwrap(), model.objects());
        assert_eq!(*order_changes.lock(), 1);
        assert!(!model.move_row(3, 0));
    }

    #[test]
    fn test_out_of_range_counts_change_nothing() {
        let registry = registry();
        let owner = registry.create("Holder", None).unwrap();
        let items = named_items(&registry, owner, 3);
        let created = Arc::new(Mutex::new(0));
        let sink = created.clone();
        let model = ObjectTableModel::builder(registry.clone())
            .objects(items.clone())
            .creator(move |substrate| {
                *sink.lock() += 1;
                substrate.create_object("Item", None)
            })
            .build();

        let structural = Arc::new(Mutex::new(0));
        let seen = structural.clone();
        model.signals().model_about_to_reset.connect(move |_| *seen.lock() += 1);
        let seen = structural.clone();
        model.signals().rows_about_to_be_removed.connect(move |_| *seen.lock() += 1);
        let seen = structural.clone();
        model.signals().rows_about_to_be_inserted.connect(move |_| *seen.lock() += 1);

        let root = ModelIndex::invalid();
        assert!(!model.remove_rows(1, usize::MAX, &root));
        assert!(!model.remove_rows(usize::MAX, 1, &root));
        assert!(!model.move_rows(&root, 1, usize::MAX, &root, 0));
        assert!(!model.move_rows(&root, usize::MAX, 1, &root, 0));
        assert!(!model.insert_rows(0, usize::MAX, &root));
        assert!(!model.insert_rows(3, usize::MAX - 2, &root));

        assert_eq!(model.objects(), items);
        assert_eq!(registry.children(owner).unwrap(), items);
        assert!(items.iter().all(|&item| registry.contains(item)));
        assert_eq!(*created.lock(), 0);
        assert_eq!(*structural.lock(), 0);
    }

    #[test]
    fn test_failed_creation_rolls_back() {
        let registry = registry();
        let owner = registry.create("Holder", None).unwrap();
        let items = named_items(&registry, owner, 1);
        let made = Arc::new(Mutex::new(Vec::new()));
        let sink = made.clone();
        let model = ObjectTableModel::builder(registry.clone())
            .objects(items.clone())
            .creator(move |substrate| {
                let mut made = sink.lock();
                if made.len() == 2 {
                    return substrate.create_object("Missing", None);
                }
                let object = substrate.create_object("Item", None)?;
                made.push(object);
                Ok(object)
            })
            .build();

        assert!(!model.insert_rows(0, 3, &ModelIndex::invalid()));
        assert_eq!(model.objects(), items);
        assert!(made.lock().iter().all(|&object| !registry.contains(object)));
    }
}
