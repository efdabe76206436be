//! Horizon Inspector - property inspection and editing for reflective objects.
//!
//! This is the main crate. It layers Model/View projections and an editing
//! delegate over the object system in [`horizon_inspector_core`], which is
//! re-exported here.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_inspector::prelude::*;
//!
//! let registry = Arc::new(SharedObjectRegistry::new());
//! registry
//!     .register_class(ClassInfo::new("Lamp").property(PropertyMeta::new("on", ValueKind::Bool), false))
//!     .unwrap();
//! let lamp = registry.create("Lamp", None).unwrap();
//!
//! let model = ObjectTreeModel::new(registry.clone());
//! model.set_object(Some(lamp));
//! // objectName, on
//! assert_eq!(model.row_count(&ModelIndex::invalid()), 2);
//! ```

pub use horizon_inspector_core::*;

pub mod model;
pub mod prelude;
