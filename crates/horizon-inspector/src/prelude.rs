//! Prelude module for Horizon Inspector.
//!
//! ```ignore
//! use horizon_inspector::prelude::*;
//! ```
//!
//! This provides access to the object system (`SharedObjectRegistry`,
//! `ObjectSubstrate`, `Value`), the models and the editing delegate.

// ============================================================================
// Object System
// ============================================================================

pub use crate::{
    Action, ClassInfo, Enumerator, ObjectError, ObjectId, ObjectResult, ObjectSubstrate,
    PropertyMeta, SharedObjectRegistry, Value, ValueKind,
};

// ============================================================================
// Signals and Properties
// ============================================================================

pub use crate::{ConnectionId, Property, Signal};

// ============================================================================
// Geometry
// ============================================================================

pub use crate::{Point, PointF, Rect, RectF, Size, SizeF};

// ============================================================================
// Models
// ============================================================================

pub use crate::model::{
    CheckState, DepthLimit, ItemFlags, ItemModel, ItemRole, ModelIndex, ModelSignals,
    ObjectPropertyModel, ObjectTableModel, ObjectTreeModel, Orientation, PropertyModel,
};

// ============================================================================
// Editing
// ============================================================================

pub use crate::model::{
    CellEditor, EditorKind, EditorState, MouseButton, MouseEvent, MouseEventKind,
    PaintInstruction, PropertyDelegate, StyleOptionViewItem,
};
