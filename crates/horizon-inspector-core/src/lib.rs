//! Core systems for Horizon Inspector.
//!
//! This crate provides the object side of the inspector:
//!
//! - **Values**: the [`Value`] tagged union and geometry types
//! - **Property metadata**: [`PropertyMeta`], [`Enumerator`], [`ClassInfo`]
//! - **Substrate contract**: [`ObjectSubstrate`], the narrow interface the
//!   models read and write objects through
//! - **Object registry**: an arena-backed reference implementation of the
//!   substrate with classes, hierarchy and dynamic properties
//! - **Signals**: direct-invocation change notification
//!
//! # Example
//!
//! ```
//! use horizon_inspector_core::{
//!     ClassInfo, ObjectSubstrate, PropertyMeta, SharedObjectRegistry, Value, ValueKind,
//! };
//!
//! let registry = SharedObjectRegistry::new();
//! registry
//!     .register_class(ClassInfo::new("Gear").property(PropertyMeta::new("teeth", ValueKind::Int), 12))
//!     .unwrap();
//!
//! let gear = registry.create("Gear", None).unwrap();
//! assert_eq!(registry.set_property(gear, "teeth", Value::Int(24)), Ok(true));
//! assert_eq!(registry.property(gear, "teeth"), Ok(Value::Int(24)));
//!
//! // Unknown names become dynamic properties.
//! assert_eq!(registry.set_property(gear, "oiled", Value::Bool(true)), Ok(false));
//! assert_eq!(registry.dynamic_property_names(gear).unwrap(), ["oiled"]);
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod object;
pub mod property;
pub mod signal;
mod substrate;
mod value;

pub use error::{ObjectError, ObjectResult};
pub use geometry::{Point, PointF, Rect, RectF, Size, SizeF};
pub use logging::{ObjectTreeDebug, TreeFormatOptions, TreeStyle};
pub use object::{ObjectId, ObjectRegistry, SharedObjectRegistry};
pub use property::{ClassInfo, Enumerator, OBJECT_NAME_PROPERTY, Property, PropertyDecl, PropertyMeta};
pub use signal::{ConnectionId, Signal};
pub use substrate::ObjectSubstrate;
pub use value::{Action, Value, ValueKind};
