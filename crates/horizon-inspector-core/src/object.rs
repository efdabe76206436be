//! Arena-backed reference object store.
//!
//! Provides:
//! - Stable object identifiers via slotmap storage
//! - A class table with single inheritance of property declarations
//! - Parent-child relationships with cascade destroy
//! - Declared and dynamic property storage
//!
//! [`ObjectRegistry`] is the single-owner store with a `&mut self` API.
//! [`SharedObjectRegistry`] wraps it in a lock and implements
//! [`ObjectSubstrate`], which is what the models consume.
//!
//! # Write semantics
//!
//! [`ObjectRegistry::set_property`] mirrors the behavior of common
//! reflection systems: writing a declared writable property with a value of
//! the declared kind reports `true`; read-only properties and kind
//! mismatches report `false` without storing; any other name attaches (or
//! replaces) a dynamic property and reports `false` even though the value
//! was stored. Writing [`Value::None`] to a dynamic property removes it.

use std::collections::HashMap;

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

use crate::error::{ObjectError, ObjectResult};
use crate::logging::targets;
use crate::property::{ClassInfo, OBJECT_NAME_PROPERTY, PropertyDecl, PropertyMeta};
use crate::substrate::ObjectSubstrate;
use crate::value::{Value, ValueKind};

new_key_type! {
    /// A unique identifier for an object in a registry.
    ///
    /// IDs stay valid while the object tree changes and become invalid when
    /// the object is destroyed.
    pub struct ObjectId;
}

/// A registered class with its inherited declarations resolved.
#[derive(Debug, Clone)]
struct ClassEntry {
    info: ClassInfo,
    /// `objectName` first, then inherited declarations, then own ones.
    declarations: Vec<PropertyDecl>,
}

impl ClassEntry {
    fn declaration(&self, name: &str) -> Option<&PropertyDecl> {
        self.declarations.iter().find(|d| d.meta.name == name)
    }
}

/// Internal data stored for each object.
#[derive(Debug)]
struct ObjectData {
    name: String,
    class: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    values: HashMap<String, Value>,
    /// Dynamic properties in attachment order.
    dynamic: Vec<(String, Value)>,
}

/// Central store for objects and their classes.
pub struct ObjectRegistry {
    classes: HashMap<String, ClassEntry>,
    objects: SlotMap<ObjectId, ObjectData>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
            objects: SlotMap::with_key(),
        }
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Register a class.
    ///
    /// The superclass, if any, must already be registered. Registering a name
    /// twice replaces the earlier declaration for objects created afterwards.
    pub fn register_class(&mut self, info: ClassInfo) -> ObjectResult<()> {
        let mut declarations = match info.superclass() {
            Some(superclass) => self
                .classes
                .get(superclass)
                .ok_or_else(|| ObjectError::UnknownClass(superclass.to_string()))?
                .declarations
                .clone(),
            None => vec![PropertyDecl {
                meta: PropertyMeta::new(OBJECT_NAME_PROPERTY, ValueKind::String),
                default: Value::String(String::new()),
            }],
        };

        for decl in info.declarations() {
            match declarations.iter_mut().find(|d| d.meta.name == decl.meta.name) {
                Some(existing) => *existing = decl.clone(),
                None => declarations.push(decl.clone()),
            }
        }

        tracing::trace!(
            target: targets::OBJECT,
            class = info.name(),
            property_count = declarations.len(),
            "registered class"
        );
        self.classes.insert(
            info.name().to_string(),
            ClassEntry { info, declarations },
        );
        Ok(())
    }

    /// The declaration a class was registered with.
    pub fn class_info(&self, class: &str) -> Option<&ClassInfo> {
        self.classes.get(class).map(|entry| &entry.info)
    }

    /// Returns `true` if `class` is `ancestor` or inherits from it.
    pub fn inherits(&self, class: &str, ancestor: &str) -> bool {
        let mut current = Some(class);
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self.classes.get(name).and_then(|e| e.info.superclass());
        }
        false
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Instantiate `class`, optionally under `parent`.
    pub fn create(&mut self, class: &str, parent: Option<ObjectId>) -> ObjectResult<ObjectId> {
        let entry = self
            .classes
            .get(class)
            .ok_or_else(|| ObjectError::UnknownClass(class.to_string()))?;
        if let Some(parent_id) = parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
        }

        let values = entry
            .declarations
            .iter()
            .filter(|d| d.meta.name != OBJECT_NAME_PROPERTY)
            .map(|d| (d.meta.name.clone(), d.default.clone()))
            .collect();
        let id = self.objects.insert(ObjectData {
            name: String::new(),
            class: class.to_string(),
            parent: None,
            children: Vec::new(),
            values,
            dynamic: Vec::new(),
        });
        tracing::trace!(target: targets::OBJECT, ?id, class, "created object");

        if parent.is_some() {
            self.set_parent(id, parent)?;
        }
        Ok(id)
    }

    /// Remove an object and all its descendants.
    #[tracing::instrument(skip(self), target = "horizon_inspector_core::object", level = "trace")]
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<()> {
        let descendants = self.collect_descendants(id)?;
        tracing::trace!(target: targets::OBJECT, ?id, descendant_count = descendants.len(), "destroying object tree");

        if let Some(parent_id) = self.objects.get(id).and_then(|d| d.parent) {
            if let Some(parent_data) = self.objects.get_mut(parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }

        for child_id in descendants {
            self.objects.remove(child_id);
        }
        self.objects.remove(id);
        Ok(())
    }

    /// Descendant IDs, children before parents.
    fn collect_descendants(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.collect_descendants_recursive(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants_recursive(
        &self,
        id: ObjectId,
        result: &mut Vec<ObjectId>,
    ) -> ObjectResult<()> {
        let data = self.data(id)?;
        for &child_id in &data.children {
            self.collect_descendants_recursive(child_id, result)?;
            result.push(child_id);
        }
        Ok(())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of live objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Objects without a parent.
    pub fn root_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(id, _)| id)
    }

    fn data(&self, id: ObjectId) -> ObjectResult<&ObjectData> {
        self.objects.get(id).ok_or(ObjectError::InvalidObjectId)
    }

    fn data_mut(&mut self, id: ObjectId) -> ObjectResult<&mut ObjectData> {
        self.objects.get_mut(id).ok_or(ObjectError::InvalidObjectId)
    }

    fn class_entry(&self, id: ObjectId) -> ObjectResult<&ClassEntry> {
        let class = &self.data(id)?.class;
        self.classes
            .get(class)
            .ok_or_else(|| ObjectError::UnknownClass(class.clone()))
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.data(id).map(|d| d.class.as_str())
    }

    pub fn object_name(&self, id: ObjectId) -> ObjectResult<&str> {
        self.data(id).map(|d| d.name.as_str())
    }

    pub fn set_object_name(&mut self, id: ObjectId, name: impl Into<String>) -> ObjectResult<()> {
        self.data_mut(id)?.name = name.into();
        Ok(())
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Set the parent of an object.
    ///
    /// The object is removed from its old parent and appended to the end of
    /// the new parent's children. Passing `None` makes it a root object.
    pub fn set_parent(&mut self, id: ObjectId, new_parent: Option<ObjectId>) -> ObjectResult<()> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }
        if let Some(parent_id) = new_parent {
            if !self.objects.contains_key(parent_id) {
                return Err(ObjectError::InvalidObjectId);
            }
            if self.is_ancestor_of(id, parent_id) {
                return Err(ObjectError::CircularParentage);
            }
        }

        let old_parent = self.objects.get(id).and_then(|d| d.parent);
        if let Some(old_parent_id) = old_parent {
            if let Some(parent_data) = self.objects.get_mut(old_parent_id) {
                parent_data.children.retain(|&child| child != id);
            }
        }

        if let Some(data) = self.objects.get_mut(id) {
            data.parent = new_parent;
        }

        if let Some(parent_id) = new_parent {
            if let Some(parent_data) = self.objects.get_mut(parent_id) {
                parent_data.children.push(id);
            }
        }
        Ok(())
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, potential_ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.objects.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.data(id).map(|d| d.parent)
    }

    pub fn children(&self, id: ObjectId) -> ObjectResult<&[ObjectId]> {
        self.data(id).map(|d| d.children.as_slice())
    }

    /// The first direct child with the given object name.
    pub fn find_child_by_name(&self, id: ObjectId, name: &str) -> ObjectResult<Option<ObjectId>> {
        let data = self.data(id)?;
        Ok(data
            .children
            .iter()
            .copied()
            .find(|&child| self.objects.get(child).is_some_and(|c| c.name == name)))
    }

    /// Direct children that are instances of `class` or a subclass of it.
    pub fn find_children_by_class(&self, id: ObjectId, class: &str) -> ObjectResult<Vec<ObjectId>> {
        let data = self.data(id)?;
        Ok(data
            .children
            .iter()
            .copied()
            .filter(|&child| {
                self.objects
                    .get(child)
                    .is_some_and(|c| self.inherits(&c.class, class))
            })
            .collect())
    }

    /// Replace the order of `parent`'s children with `order`.
    #[tracing::instrument(skip(self, order), target = "horizon_inspector_core::object", level = "trace")]
    pub fn set_child_order(&mut self, parent: ObjectId, order: &[ObjectId]) -> ObjectResult<()> {
        let data = self.data_mut(parent)?;
        let mut current = data.children.clone();
        let mut requested = order.to_vec();
        current.sort();
        requested.sort();
        if current != requested {
            return Err(ObjectError::InvalidChildOrder);
        }
        data.children = order.to_vec();
        Ok(())
    }

    /// Position of the object within its parent's children.
    pub fn sibling_index(&self, id: ObjectId) -> ObjectResult<Option<usize>> {
        let data = self.data(id)?;
        Ok(data.parent.and_then(|parent_id| {
            self.objects
                .get(parent_id)
                .and_then(|p| p.children.iter().position(|&c| c == id))
        }))
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Declared properties in declaration order.
    pub fn properties(&self, id: ObjectId) -> ObjectResult<Vec<PropertyMeta>> {
        Ok(self
            .class_entry(id)?
            .declarations
            .iter()
            .map(|d| d.meta.clone())
            .collect())
    }

    pub fn property_meta(&self, id: ObjectId, name: &str) -> ObjectResult<Option<PropertyMeta>> {
        Ok(self.class_entry(id)?.declaration(name).map(|d| d.meta.clone()))
    }

    /// Dynamic property names in attachment order.
    pub fn dynamic_property_names(&self, id: ObjectId) -> ObjectResult<Vec<&str>> {
        Ok(self.data(id)?.dynamic.iter().map(|(n, _)| n.as_str()).collect())
    }

    /// Read a declared or dynamic property.
    pub fn property(&self, id: ObjectId, name: &str) -> ObjectResult<Value> {
        let data = self.data(id)?;
        if name == OBJECT_NAME_PROPERTY {
            return Ok(Value::String(data.name.clone()));
        }
        if let Some(value) = data.values.get(name) {
            return Ok(value.clone());
        }
        data.dynamic
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| ObjectError::PropertyNotFound(name.to_string()))
    }

    /// Write a property by name. See the module docs for the meaning of the
    /// returned flag.
    pub fn set_property(&mut self, id: ObjectId, name: &str, value: Value) -> ObjectResult<bool> {
        if let Some(decl) = self.class_entry(id)?.declaration(name) {
            let meta = decl.meta.clone();
            return match self.write_declared(id, &meta, value) {
                Ok(()) => Ok(true),
                Err(
                    err @ (ObjectError::PropertyReadOnly(_)
                    | ObjectError::PropertyTypeMismatch { .. }),
                ) => {
                    tracing::trace!(target: targets::PROPERTY, ?id, %err, "property write refused");
                    Ok(false)
                }
                Err(err) => Err(err),
            };
        }
        self.set_dynamic_property(id, name, value)?;
        Ok(false)
    }

    /// Write a declared property, coercing the value to the declared kind.
    pub fn write_declared(
        &mut self,
        id: ObjectId,
        meta: &PropertyMeta,
        value: Value,
    ) -> ObjectResult<()> {
        if !meta.writable {
            return Err(ObjectError::PropertyReadOnly(meta.name.clone()));
        }
        let coerced = value
            .coerce_to(meta.kind)
            .ok_or_else(|| ObjectError::type_mismatch(&meta.name, meta.kind, value.kind()))?;

        let data = self.data_mut(id)?;
        match coerced {
            Value::String(name) if meta.name == OBJECT_NAME_PROPERTY => data.name = name,
            coerced => {
                data.values.insert(meta.name.clone(), coerced);
            }
        }
        Ok(())
    }

    /// Attach or replace a dynamic property. `Value::None` removes it.
    ///
    /// Replacing keeps the property's attachment position.
    pub fn set_dynamic_property(
        &mut self,
        id: ObjectId,
        name: impl Into<String>,
        value: Value,
    ) -> ObjectResult<()> {
        let name = name.into();
        let data = self.data_mut(id)?;
        let position = data.dynamic.iter().position(|(n, _)| *n == name);
        match (position, value) {
            (Some(index), Value::None) => {
                data.dynamic.remove(index);
            }
            (None, Value::None) => {}
            (Some(index), value) => data.dynamic[index].1 = value,
            (None, value) => data.dynamic.push((name, value)),
        }
        Ok(())
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around [`ObjectRegistry`].
///
/// This is the type models are usually handed, as an
/// `Arc<dyn ObjectSubstrate>`.
pub struct SharedObjectRegistry {
    inner: RwLock<ObjectRegistry>,
}

impl SharedObjectRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ObjectRegistry::new()),
        }
    }

    /// Register a class.
    pub fn register_class(&self, info: ClassInfo) -> ObjectResult<()> {
        self.inner.write().register_class(info)
    }

    /// Instantiate a class.
    pub fn create(&self, class: &str, parent: Option<ObjectId>) -> ObjectResult<ObjectId> {
        self.inner.write().create(class, parent)
    }

    /// Attach, replace or remove a dynamic property.
    pub fn set_dynamic_property(
        &self,
        id: ObjectId,
        name: impl Into<String>,
        value: Value,
    ) -> ObjectResult<()> {
        self.inner.write().set_dynamic_property(id, name, value)
    }

    /// Direct children of the given class or its subclasses.
    pub fn find_children_by_class(&self, id: ObjectId, class: &str) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().find_children_by_class(id, class)
    }

    pub fn object_count(&self) -> usize {
        self.inner.read().object_count()
    }

    pub fn root_objects(&self) -> Vec<ObjectId> {
        self.inner.read().root_objects().collect()
    }

    /// Access the registry with a read lock for compound operations.
    pub fn with_read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ObjectRegistry) -> R,
    {
        f(&self.inner.read())
    }

    /// Access the registry with a write lock for compound operations.
    pub fn with_write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ObjectRegistry) -> R,
    {
        f(&mut self.inner.write())
    }
}

impl Default for SharedObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectSubstrate for SharedObjectRegistry {
    fn contains(&self, id: ObjectId) -> bool {
        self.inner.read().contains(id)
    }

    fn type_name(&self, id: ObjectId) -> ObjectResult<String> {
        self.inner.read().type_name(id).map(str::to_string)
    }

    fn object_name(&self, id: ObjectId) -> ObjectResult<String> {
        self.inner.read().object_name(id).map(str::to_string)
    }

    fn set_object_name(&self, id: ObjectId, name: &str) -> ObjectResult<()> {
        self.inner.write().set_object_name(id, name)
    }

    fn properties(&self, id: ObjectId) -> ObjectResult<Vec<PropertyMeta>> {
        self.inner.read().properties(id)
    }

    fn property_meta(&self, id: ObjectId, name: &str) -> ObjectResult<Option<PropertyMeta>> {
        self.inner.read().property_meta(id, name)
    }

    fn dynamic_property_names(&self, id: ObjectId) -> ObjectResult<Vec<String>> {
        self.inner
            .read()
            .dynamic_property_names(id)
            .map(|names| names.into_iter().map(str::to_string).collect())
    }

    fn property(&self, id: ObjectId, name: &str) -> ObjectResult<Value> {
        self.inner.read().property(id, name)
    }

    fn set_property(&self, id: ObjectId, name: &str, value: Value) -> ObjectResult<bool> {
        self.inner.write().set_property(id, name, value)
    }

    fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.inner.read().parent(id)
    }

    fn set_parent(&self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.inner.write().set_parent(id, parent)
    }

    fn children(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.inner.read().children(id).map(<[ObjectId]>::to_vec)
    }

    fn find_child(&self, id: ObjectId, name: &str) -> ObjectResult<Option<ObjectId>> {
        self.inner.read().find_child_by_name(id, name)
    }

    fn set_child_order(&self, parent: ObjectId, order: &[ObjectId]) -> ObjectResult<()> {
        self.inner.write().set_child_order(parent, order)
    }

    fn create_object(&self, class: &str, parent: Option<ObjectId>) -> ObjectResult<ObjectId> {
        self.inner.write().create(class, parent)
    }

    fn destroy(&self, id: ObjectId) -> ObjectResult<()> {
        self.inner.write().destroy(id)
    }
}

// Models share the registry across threads behind an Arc.
static_assertions::assert_impl_all!(SharedObjectRegistry: Send, Sync);
