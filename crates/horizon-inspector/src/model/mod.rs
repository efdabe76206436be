//! Model/View projections of object properties.
//!
//! Every projection answers one question: which object and which property
//! does a cell address? Reading, writing, flags and notification are shared
//! through [`PropertyModel`]; the projections only differ in how they lay
//! objects and properties out.
//!
//! # Projections
//!
//! - [`ObjectTreeModel`]: one object and its descendants as a (name, value)
//!   tree, bounded by a [`DepthLimit`].
//! - [`ObjectTableModel`]: a list of homogeneous objects, one row per object
//!   and one column per property, with insert, remove and move.
//! - [`ObjectPropertyModel`]: the properties of one object as rows.
//!
//! # Editing
//!
//! - [`codec`]: canonical display text and loose parsing of values.
//! - [`PropertyDelegate`]: editor choice, painting, commit and mouse
//!   handling per value kind, and [`CellEditor`] for one editor's lifecycle.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_inspector::model::{ItemModel, ItemRole, ModelIndex, ObjectTableModel};
//! use horizon_inspector_core::{ClassInfo, PropertyMeta, SharedObjectRegistry, Value, ValueKind};
//!
//! let registry = Arc::new(SharedObjectRegistry::new());
//! registry
//!     .register_class(ClassInfo::new("Item").property(PropertyMeta::new("count", ValueKind::Int), 0))
//!     .unwrap();
//! let item = registry.create("Item", None).unwrap();
//!
//! let model = ObjectTableModel::builder(registry.clone()).objects([item]).properties("count").build();
//! model.signals().data_changed.connect(|(top_left, _, _)| {
//!     println!("changed row {}", top_left.row());
//! });
//!
//! let cell = model.index(0, 0, &ModelIndex::invalid());
//! assert!(model.set_data(&cell, Value::Int(5), ItemRole::Edit));
//! assert_eq!(model.data(&cell, ItemRole::Display), Value::Int(5));
//! ```

mod address;
pub mod codec;
mod delegate;
mod headers;
mod index;
mod object_model;
mod property_model;
mod role;
mod table_model;
mod traits;
mod tree_model;

pub use address::{PropertyAddress, resolve_descendant};
pub use codec::{CodecError, CodecResult};
pub use delegate::{
    CellEditor, EditorKind, EditorState, MouseButton, MouseEvent, MouseEventKind, PaintInstruction,
    PropertyDelegate, StyleOptionViewItem,
};
pub use headers::PropertyHeaders;
pub use index::ModelIndex;
pub use object_model::ObjectPropertyModel;
pub use property_model::{CellAddress, PropertyModel, is_dynamic_property};
pub use role::{CheckState, ItemRole};
pub use table_model::{ObjectCreator, ObjectDestructor, ObjectTableModel, ObjectTableModelBuilder};
pub use traits::{ItemFlags, ItemModel, ModelSignals, Orientation};
pub use tree_model::{DepthLimit, ObjectTreeModel};

/// Tracing targets of the model layer.
pub mod targets {
    pub const MODEL: &str = "horizon_inspector::model";
    pub const TREE: &str = "horizon_inspector::model::tree";
    pub const TABLE: &str = "horizon_inspector::model::table";
    pub const DELEGATE: &str = "horizon_inspector::model::delegate";
}
