//! Hierarchical projection of an object graph.
//!
//! [`ObjectTreeModel`] mirrors one bound object as a tree: every object node
//! owns one leaf per (filtered) declared property, then one leaf per
//! dynamic property, then, depth permitting, one object node per child
//! object. Children are grouped by their concrete type, groups ordered by the
//! first child of each type.
//!
//! The tree is cached in an arena and rebuilt wholesale whenever the bound
//! object, the depth limit or the property filter changes. Indices carry the
//! arena generation, so indices handed out before a rebuild resolve to
//! nothing afterwards.

use std::sync::Arc;

use parking_lot::RwLock;

use horizon_inspector_core::property::Property;
use horizon_inspector_core::{ObjectId, ObjectSubstrate, Value};

use super::headers::PropertyHeaders;
use super::index::ModelIndex;
use super::property_model::{CellAddress, PropertyModel};
use super::role::ItemRole;
use super::targets;
use super::traits::{ItemFlags, ItemModel, ModelSignals, Orientation};

/// How many levels of child objects the tree descends into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthLimit {
    #[default]
    Unlimited,
    /// `Levels(0)` shows the bound object's properties only.
    Levels(usize),
}

impl DepthLimit {
    /// Returns `true` if child objects are included at this budget.
    pub fn allows_children(&self) -> bool {
        match self {
            DepthLimit::Unlimited => true,
            DepthLimit::Levels(n) => *n > 0,
        }
    }

    /// The budget one level further down.
    pub fn descend(&self) -> DepthLimit {
        match self {
            DepthLimit::Unlimited => DepthLimit::Unlimited,
            DepthLimit::Levels(n) => DepthLimit::Levels(n.saturating_sub(1)),
        }
    }
}

/// Negative values mean [`DepthLimit::Unlimited`].
impl From<i32> for DepthLimit {
    fn from(depth: i32) -> Self {
        usize::try_from(depth).map_or(DepthLimit::Unlimited, DepthLimit::Levels)
    }
}

const ROOT: usize = 0;

struct TreeNode {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Set for object nodes.
    object: Option<ObjectId>,
    /// Set for property leaves.
    property: Option<String>,
}

#[derive(Default)]
struct NodeArena {
    generation: u32,
    nodes: Vec<TreeNode>,
}

impl NodeArena {
    fn encode(&self, slot: usize) -> u64 {
        (u64::from(self.generation) << 32) | (slot as u64 + 1)
    }

    fn decode(&self, internal_id: u64) -> Option<usize> {
        if (internal_id >> 32) as u32 != self.generation {
            return None;
        }
        let slot = (internal_id & u64::from(u32::MAX)).checked_sub(1)? as usize;
        (slot < self.nodes.len()).then_some(slot)
    }

    /// The node a valid index refers to, or the root for an invalid index.
    fn slot_for(&self, index: &ModelIndex) -> Option<usize> {
        if index.is_valid() {
            self.decode(index.internal_id())
        } else {
            Some(ROOT)
        }
    }

    fn push(&mut self, parent: Option<usize>, object: Option<ObjectId>, property: Option<String>) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(TreeNode {
            parent,
            children: Vec::new(),
            object,
            property,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(slot);
        }
        slot
    }

    fn rebuild(
        &mut self,
        substrate: &dyn ObjectSubstrate,
        object: Option<ObjectId>,
        depth: DepthLimit,
        headers: &PropertyHeaders,
    ) {
        self.generation = self.generation.wrapping_add(1);
        self.nodes.clear();
        let root = self.push(None, object, None);
        if let Some(object) = object.filter(|&id| substrate.contains(id)) {
            self.populate(substrate, root, object, depth, headers);
        }
    }

    fn populate(
        &mut self,
        substrate: &dyn ObjectSubstrate,
        slot: usize,
        object: ObjectId,
        depth: DepthLimit,
        headers: &PropertyHeaders,
    ) {
        for meta in substrate.properties(object).unwrap_or_default() {
            if headers.allows(&meta.name) {
                self.push(Some(slot), None, Some(meta.name));
            }
        }
        for name in substrate.dynamic_property_names(object).unwrap_or_default() {
            if headers.allows(&name) {
                self.push(Some(slot), None, Some(name));
            }
        }

        if !depth.allows_children() {
            return;
        }

        let mut groups: Vec<(String, Vec<ObjectId>)> = Vec::new();
        for child in substrate.children(object).unwrap_or_default() {
            let kind = substrate.type_name(child).unwrap_or_default();
            match groups.iter_mut().find(|(name, _)| *name == kind) {
                Some((_, members)) => members.push(child),
                None => groups.push((kind, vec![child])),
            }
        }
        let depth = depth.descend();
        for child in groups.into_iter().flat_map(|(_, members)| members) {
            let child_slot = self.push(Some(slot), Some(child), None);
            self.populate(substrate, child_slot, child, depth, headers);
        }
    }

    /// Build the full index chain for `slot`. The root maps to the invalid
    /// index.
    fn index_for_slot(&self, slot: usize, column: usize) -> ModelIndex {
        let Some(parent) = self.nodes.get(slot).and_then(|node| node.parent) else {
            return ModelIndex::invalid();
        };
        let row = self.nodes[parent]
            .children
            .iter()
            .position(|&child| child == slot)
            .unwrap_or_default();
        ModelIndex::with_internal_id(row, column, self.index_for_slot(parent, 0), self.encode(slot))
    }

    /// Object node: the object itself. Leaf: the nearest ancestor object.
    fn address(&self, slot: usize) -> Option<CellAddress> {
        let node = self.nodes.get(slot)?;
        if let Some(object) = node.object {
            return Some(CellAddress::object(object));
        }
        let owner = self.nodes.get(node.parent?)?.object?;
        node.property
            .as_ref()
            .map(|name| CellAddress::property(owner, name.clone()))
    }
}

/// A two-column (name, value) tree over one object and its descendants.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_inspector::model::{ItemModel, ItemRole, ModelIndex, ObjectTreeModel};
/// use horizon_inspector_core::{ClassInfo, ObjectSubstrate, SharedObjectRegistry, Value};
///
/// let registry = Arc::new(SharedObjectRegistry::new());
/// registry.register_class(ClassInfo::new("Node")).unwrap();
/// let root = registry.create("Node", None).unwrap();
/// registry.set_object_name(root, "scene").unwrap();
/// registry.create("Node", Some(root)).unwrap();
///
/// let model = ObjectTreeModel::new(registry.clone());
/// model.set_object(Some(root));
///
/// // objectName leaf, then the child object node.
/// assert_eq!(model.row_count(&ModelIndex::invalid()), 2);
/// let name = model.index(0, 1, &ModelIndex::invalid());
/// assert_eq!(model.data(&name, ItemRole::Display), Value::from("scene"));
/// let child = model.index(1, 0, &ModelIndex::invalid());
/// assert_eq!(model.data(&child, ItemRole::Display), Value::from("Node"));
/// ```
pub struct ObjectTreeModel {
    substrate: Arc<dyn ObjectSubstrate>,
    object: Property<Option<ObjectId>>,
    max_depth: Property<DepthLimit>,
    headers: RwLock<PropertyHeaders>,
    tree: RwLock<NodeArena>,
    signals: ModelSignals,
}

impl ObjectTreeModel {
    pub fn new(substrate: Arc<dyn ObjectSubstrate>) -> Self {
        let mut tree = NodeArena::default();
        tree.push(None, None, None);
        Self {
            substrate,
            object: Property::new(None),
            max_depth: Property::new(DepthLimit::Unlimited),
            headers: RwLock::new(PropertyHeaders::new()),
            tree: RwLock::new(tree),
            signals: ModelSignals::new(),
        }
    }

    /// The bound object.
    pub fn object(&self) -> Option<ObjectId> {
        self.object.get()
    }

    /// Bind an object and rebuild.
    pub fn set_object(&self, object: Option<ObjectId>) {
        self.signals.emit_reset(|| {
            self.object.set(object);
            self.rebuild();
        });
    }

    pub fn max_depth(&self) -> DepthLimit {
        self.max_depth.get()
    }

    /// Change the depth limit and rebuild. Accepts `-1` for unlimited.
    pub fn set_max_depth(&self, depth: impl Into<DepthLimit>) {
        let depth = depth.into();
        self.signals.emit_reset(|| {
            self.max_depth.set(depth);
            self.rebuild();
        });
    }

    /// The property filter. Empty means every property is shown.
    pub fn properties(&self) -> Vec<String> {
        self.headers.read().names().to_vec()
    }

    /// Replace the property filter from `"name: header, name, ..."` and
    /// rebuild.
    pub fn set_properties(&self, spec: &str) {
        self.signals.emit_reset(|| {
            self.headers.write().set_properties(spec);
            self.rebuild();
        });
    }

    /// Add one `"name"` or `"name: header"` entry and rebuild.
    pub fn add_property(&self, entry: &str) {
        self.signals.emit_reset(|| {
            self.headers.write().add_property(entry);
            self.rebuild();
        });
    }

    /// Rebuild from the current object graph.
    pub fn refresh(&self) {
        self.signals.emit_reset(|| self.rebuild());
    }

    #[tracing::instrument(skip(self), target = "horizon_inspector::model::tree", level = "trace")]
    fn rebuild(&self) {
        let headers = self.headers.read().clone();
        let mut tree = self.tree.write();
        tree.rebuild(self.substrate.as_ref(), self.object.get(), self.max_depth.get(), &headers);
        tracing::trace!(target: targets::TREE, nodes = tree.nodes.len(), generation = tree.generation, "tree rebuilt");
    }

    fn slot(&self, index: &ModelIndex) -> Option<usize> {
        self.tree.read().slot_for(index)
    }
}

impl PropertyModel for ObjectTreeModel {
    fn substrate(&self) -> &dyn ObjectSubstrate {
        self.substrate.as_ref()
    }

    fn address_at(&self, index: &ModelIndex) -> Option<CellAddress> {
        if !index.is_valid() {
            return None;
        }
        let tree = self.tree.read();
        tree.address(tree.decode(index.internal_id())?)
    }
}

impl ItemModel for ObjectTreeModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        let tree = self.tree.read();
        tree.slot_for(parent)
            .map_or(0, |slot| tree.nodes[slot].children.len())
    }

    fn column_count(&self, parent: &ModelIndex) -> usize {
        if self.slot(parent).is_some() { 2 } else { 0 }
    }

    fn data(&self, index: &ModelIndex, _role: ItemRole) -> Value {
        let Some(address) = self.address_at(index) else {
            return Value::None;
        };
        if !self.substrate.contains(address.object) {
            return Value::None;
        }
        match (index.column(), address.property) {
            (0, None) => self
                .substrate
                .type_name(address.object)
                .map_or(Value::None, Value::from),
            (0, Some(name)) => Value::from(self.headers.read().label(&name)),
            (1, None) => self
                .substrate
                .object_name(address.object)
                .map_or(Value::None, Value::from),
            (1, Some(_)) => self.read_property(index),
            _ => Value::None,
        }
    }

    fn set_data(&self, index: &ModelIndex, value: Value, role: ItemRole) -> bool {
        if role != ItemRole::Edit || index.column() != 1 {
            return false;
        }
        let Some(address) = self.address_at(index) else {
            return false;
        };
        if address.property.is_some() {
            return self.write_property(index, value);
        }

        let Some(name) = value.into_string() else {
            return false;
        };
        let before = self.substrate.object_name(address.object).unwrap_or_default();
        if let Err(err) = self.substrate.set_object_name(address.object, &name) {
            tracing::debug!(target: targets::TREE, object = ?address.object, %err, "rename failed");
            return false;
        }
        if before != name {
            self.signals.emit_data_changed_single(index.clone());
        }
        true
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        match self.address_at(index) {
            Some(address) if self.substrate.contains(address.object) => {
                ItemFlags::new().with_editable(index.column() == 1)
            }
            _ => ItemFlags::disabled(),
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= 2 {
            return ModelIndex::invalid();
        }
        let tree = self.tree.read();
        let Some(child) = tree
            .slot_for(parent)
            .and_then(|slot| tree.nodes[slot].children.get(row).copied())
        else {
            return ModelIndex::invalid();
        };
        ModelIndex::with_internal_id(row, column, parent.clone(), tree.encode(child))
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }
        let tree = self.tree.read();
        match tree
            .decode(index.internal_id())
            .and_then(|slot| tree.nodes[slot].parent)
        {
            Some(parent) => tree.index_for_slot(parent, 0),
            None => ModelIndex::invalid(),
        }
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> Value {
        if role != ItemRole::Display || orientation != Orientation::Horizontal {
            return Value::None;
        }
        match section {
            0 => Value::from("Name"),
            1 => Value::from("Value"),
            _ => Value::None,
        }
    }
}

static_assertions::assert_impl_all!(ObjectTreeModel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_inspector_core::{ClassInfo, PropertyMeta, SharedObjectRegistry, ValueKind};

    struct Scene {
        registry: Arc<SharedObjectRegistry>,
        root: ObjectId,
        gadget_a: ObjectId,
        widget: ObjectId,
        gadget_b: ObjectId,
    }

    // root(Widget) -> [gadget_a(Gadget), widget(Widget) -> [nested(Widget)], gadget_b(Gadget)]
    fn scene() -> Scene {
        let registry = Arc::new(SharedObjectRegistry::new());
        registry
            .register_class(
                ClassInfo::new("Widget").property(PropertyMeta::new("count", ValueKind::Int), 0),
            )
            .unwrap();
        registry.register_class(ClassInfo::new("Gadget")).unwrap();

        let root = registry.create("Widget", None).unwrap();
        let gadget_a = registry.create("Gadget", Some(root)).unwrap();
        let widget = registry.create("Widget", Some(root)).unwrap();
        let gadget_b = registry.create("Gadget", Some(root)).unwrap();
        registry.create("Widget", Some(widget)).unwrap();
        registry
            .set_dynamic_property(root, "flag", Value::Bool(true))
            .unwrap();
        Scene {
            registry,
            root,
            gadget_a,
            widget,
            gadget_b,
        }
    }

    fn model(scene: &Scene) -> ObjectTreeModel {
        let model = ObjectTreeModel::new(scene.registry.clone());
        model.set_object(Some(scene.root));
        model
    }

    fn top(model: &ObjectTreeModel, row: usize, column: usize) -> ModelIndex {
        model.index(row, column, &ModelIndex::invalid())
    }

    #[test]
    fn test_depth_limit_from_sentinel() {
        assert_eq!(DepthLimit::from(-1), DepthLimit::Unlimited);
        assert_eq!(DepthLimit::from(2), DepthLimit::Levels(2));
        assert!(!DepthLimit::Levels(0).allows_children());
        assert_eq!(DepthLimit::Levels(1).descend(), DepthLimit::Levels(0));
        assert_eq!(DepthLimit::Unlimited.descend(), DepthLimit::Unlimited);
    }

    #[test]
    fn test_empty_model() {
        let registry = Arc::new(SharedObjectRegistry::new());
        let model = ObjectTreeModel::new(registry);
        assert_eq!(model.row_count(&ModelIndex::invalid()), 0);
        assert_eq!(model.column_count(&ModelIndex::invalid()), 2);
        assert!(!top(&model, 0, 0).is_valid());
    }

    #[test]
    fn test_properties_then_grouped_children() {
        let scene = scene();
        let model = model(&scene);

        // objectName, count, flag, then both gadgets ahead of the widget.
        assert_eq!(model.row_count(&ModelIndex::invalid()), 6);
        let labels: Vec<Value> = (0..3)
            .map(|row| model.data(&top(&model, row, 0), ItemRole::Display))
            .collect();
        assert_eq!(labels, [Value::from("objectName"), Value::from("count"), Value::from("flag")]);

        let objects: Vec<Option<ObjectId>> = (3..6).map(|row| model.object_at(&top(&model, row, 0))).collect();
        assert_eq!(objects, [Some(scene.gadget_a), Some(scene.gadget_b), Some(scene.widget)]);
        assert_eq!(model.data(&top(&model, 3, 0), ItemRole::Display), Value::from("Gadget"));
    }

    #[test]
    fn test_leaf_address_uses_owner() {
        let scene = scene();
        let model = model(&scene);
        let flag = top(&model, 2, 1);
        assert_eq!(model.object_at(&flag), Some(scene.root));
        assert_eq!(model.property_name_at(&flag).as_deref(), Some("flag"));
        assert_eq!(model.data(&flag, ItemRole::Edit), Value::Bool(true));

        let widget = top(&model, 5, 0);
        assert_eq!(model.property_name_at(&widget), None);
        let nested_count = model.index(1, 1, &widget);
        assert_eq!(model.object_at(&nested_count), Some(scene.widget));
    }

    #[test]
    fn test_depth_limit_bounds_tree() {
        let scene = scene();
        let model = model(&scene);
        let widget = top(&model, 5, 0);
        // objectName, count, nested widget
        assert_eq!(model.row_count(&widget), 3);

        model.set_max_depth(1);
        let widget = top(&model, 5, 0);
        assert_eq!(model.row_count(&widget), 2);

        model.set_max_depth(0);
        assert_eq!(model.row_count(&ModelIndex::invalid()), 3);
    }

    #[test]
    fn test_parent_chain() {
        let scene = scene();
        let model = model(&scene);
        let widget = top(&model, 5, 0);
        let nested = model.index(2, 0, &widget);
        let nested_name = model.index(0, 1, &nested);

        let parent = model.parent(&nested_name);
        assert_eq!(parent.row(), 2);
        assert_eq!(parent.column(), 0);
        assert_eq!(model.parent(&parent), widget);
        assert!(!model.parent(&widget).is_valid());
    }

    #[test]
    fn test_rebuild_invalidates_indices() {
        let scene = scene();
        let model = model(&scene);
        let stale = top(&model, 2, 1);
        model.refresh();
        assert_eq!(model.data(&stale, ItemRole::Display), Value::None);
        assert_eq!(model.column_count(&stale), 0);
        assert_eq!(model.data(&top(&model, 2, 1), ItemRole::Display), Value::Bool(true));
    }

    #[test]
    fn test_property_filter() {
        let scene = scene();
        let model = model(&scene);
        model.set_properties("count: Count");
        // count, then the three child objects
        assert_eq!(model.row_count(&ModelIndex::invalid()), 4);
        assert_eq!(model.data(&top(&model, 0, 0), ItemRole::Display), Value::from("Count"));

        model.add_property("flag");
        assert_eq!(model.properties(), ["count", "flag"]);
        assert_eq!(model.row_count(&ModelIndex::invalid()), 5);
    }

    #[test]
    fn test_rename_object_node() {
        let scene = scene();
        let model = model(&scene);
        let gadget = top(&model, 3, 1);
        assert!(model.flags(&gadget).editable);
        assert!(!model.flags(&top(&model, 3, 0)).editable);

        assert!(model.set_data(&gadget, Value::from("left"), ItemRole::Edit));
        assert_eq!(scene.registry.object_name(scene.gadget_a).unwrap(), "left");
        assert!(!model.set_data(&top(&model, 3, 0), Value::from("x"), ItemRole::Edit));
    }

    #[test]
    fn test_write_leaf() {
        let scene = scene();
        let model = model(&scene);
        assert!(model.set_data(&top(&model, 1, 1), Value::Int(4), ItemRole::Edit));
        assert_eq!(scene.registry.property(scene.root, "count").unwrap(), Value::Int(4));
        assert!(model.set_data(&top(&model, 2, 1), Value::Bool(false), ItemRole::Edit));
        assert!(!model.set_data(&top(&model, 1, 1), Value::Int(5), ItemRole::Display));
    }

    #[test]
    fn test_headers() {
        let registry = Arc::new(SharedObjectRegistry::new());
        let model = ObjectTreeModel::new(registry);
        assert_eq!(model.header_data(0, Orientation::Horizontal, ItemRole::Display), Value::from("Name"));
        assert_eq!(model.header_data(1, Orientation::Horizontal, ItemRole::Display), Value::from("Value"));
        assert_eq!(model.header_data(0, Orientation::Vertical, ItemRole::Display), Value::None);
    }
}
