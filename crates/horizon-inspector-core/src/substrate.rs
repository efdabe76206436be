//! The capability contract models consume objects through.
//!
//! Models never reach into a concrete object store. Everything they need
//! (property enumeration, get/set by name, child lookup and ordering,
//! creation and destruction) goes through [`ObjectSubstrate`]. The
//! [`SharedObjectRegistry`](crate::SharedObjectRegistry) is the reference
//! implementation; hosts with their own object system implement the trait
//! directly.
//!
//! All methods take `&self`. Implementations provide their own interior
//! mutability.

use crate::error::{ObjectError, ObjectResult};
use crate::object::ObjectId;
use crate::property::PropertyMeta;
use crate::value::Value;

/// Reflection and structure operations over an object graph.
pub trait ObjectSubstrate: Send + Sync {
    /// Returns `true` if `id` refers to a live object.
    fn contains(&self, id: ObjectId) -> bool;

    /// The concrete class name of the object.
    fn type_name(&self, id: ObjectId) -> ObjectResult<String>;

    fn object_name(&self, id: ObjectId) -> ObjectResult<String>;

    fn set_object_name(&self, id: ObjectId, name: &str) -> ObjectResult<()>;

    /// Statically declared properties in declaration order, inherited first.
    fn properties(&self, id: ObjectId) -> ObjectResult<Vec<PropertyMeta>>;

    /// Metadata for a declared property, or `None` for dynamic and unknown
    /// names.
    fn property_meta(&self, id: ObjectId, name: &str) -> ObjectResult<Option<PropertyMeta>> {
        Ok(self.properties(id)?.into_iter().find(|m| m.name == name))
    }

    /// Dynamically attached property names in attachment order.
    fn dynamic_property_names(&self, id: ObjectId) -> ObjectResult<Vec<String>>;

    /// Read a property by name.
    fn property(&self, id: ObjectId, name: &str) -> ObjectResult<Value>;

    /// Write a property by name, returning the substrate's success flag.
    ///
    /// The flag is not reliable for dynamic properties: a substrate may
    /// store the value and still report `false`.
    fn set_property(&self, id: ObjectId, name: &str, value: Value) -> ObjectResult<bool>;

    fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>>;

    /// Reparent an object. The object is appended to the new parent's
    /// children.
    fn set_parent(&self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()>;

    /// Direct children in their current order.
    fn children(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>>;

    /// The first direct child named `name`.
    fn find_child(&self, id: ObjectId, name: &str) -> ObjectResult<Option<ObjectId>> {
        for child in self.children(id)? {
            if self.object_name(child)? == name {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// Replace the order of `parent`'s children.
    ///
    /// `order` must be a permutation of the current children.
    fn set_child_order(&self, parent: ObjectId, order: &[ObjectId]) -> ObjectResult<()>;

    /// Instantiate a registered class, optionally under a parent.
    fn create_object(&self, class: &str, parent: Option<ObjectId>) -> ObjectResult<ObjectId> {
        let _ = (class, parent);
        Err(ObjectError::Unsupported("create_object"))
    }

    /// Destroy an object and its descendants.
    fn destroy(&self, id: ObjectId) -> ObjectResult<()>;
}
