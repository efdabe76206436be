//! Core traits for the model/view boundary.
//!
//! [`ItemModel`] is the surface a hosting view talks to: counts, indexed
//! reads and writes, flags, headers and change notification through
//! [`ModelSignals`].

use horizon_inspector_core::{Signal, Value};

use super::index::ModelIndex;
use super::role::ItemRole;

/// Capabilities of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    pub selectable: bool,
    pub editable: bool,
    pub enabled: bool,
}

impl ItemFlags {
    /// Enabled and selectable, not editable.
    pub fn new() -> Self {
        Self {
            selectable: true,
            enabled: true,
            ..Default::default()
        }
    }

    /// No capabilities. Returned for cells that resolve to nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Enabled, selectable and editable.
    pub fn editable() -> Self {
        Self {
            editable: true,
            ..Self::new()
        }
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Header orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Column headers.
    Horizontal,
    /// Row headers.
    Vertical,
}

/// The interface views use to read and edit a model.
///
/// All methods take `&self`; models keep their state behind locks and are
/// `Send + Sync`.
pub trait ItemModel: Send + Sync {
    /// Number of rows under `parent`.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Number of columns under `parent`.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// The value at `index`, or `Value::None`.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> Value;

    /// The index at `(row, column)` under `parent`, or an invalid index if
    /// out of range.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// The parent of `index`.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    fn signals(&self) -> &ModelSignals;

    /// Write `value` at `index`. Returns `true` on success.
    fn set_data(&self, _index: &ModelIndex, _value: Value, _role: ItemRole) -> bool {
        false
    }

    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::new()
    }

    fn has_children(&self, parent: &ModelIndex) -> bool {
        self.row_count(parent) > 0
    }

    fn header_data(&self, _section: usize, _orientation: Orientation, _role: ItemRole) -> Value {
        Value::None
    }

    /// Insert `count` rows before `row`. Returns `false` if unsupported.
    fn insert_rows(&self, _row: usize, _count: usize, _parent: &ModelIndex) -> bool {
        false
    }

    /// Remove `count` rows starting at `row`.
    fn remove_rows(&self, _row: usize, _count: usize, _parent: &ModelIndex) -> bool {
        false
    }

    /// Move `count` rows starting at `source_row` so they land at
    /// `destination_row`.
    fn move_rows(
        &self,
        _source_parent: &ModelIndex,
        _source_row: usize,
        _count: usize,
        _destination_parent: &ModelIndex,
        _destination_row: usize,
    ) -> bool {
        false
    }

    /// The index at `(row, column)` sharing `index`'s parent.
    fn sibling(&self, index: &ModelIndex, row: usize, column: usize) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }
        self.index(row, column, &index.parent())
    }
}

/// Change notifications emitted by a model.
///
/// Structural changes are bracketed: the "about to" signal fires before the
/// model mutates and the matching signal after. Brackets never nest.
pub struct ModelSignals {
    /// `(parent, first, last)` before rows are inserted.
    pub rows_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,
    /// `(parent, first, last)` after rows were inserted.
    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,
    pub rows_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,
    pub rows_removed: Signal<(ModelIndex, usize, usize)>,

    /// `(top_left, bottom_right, roles)` after values changed.
    pub data_changed: Signal<(ModelIndex, ModelIndex, Vec<ItemRole>)>,

    pub model_about_to_reset: Signal<()>,
    /// After a reset every previously obtained index is stale.
    pub model_reset: Signal<()>,

    /// New row count, after an insert or remove completed.
    pub row_count_changed: Signal<usize>,
    /// After rows were reordered.
    pub row_order_changed: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            data_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
            row_count_changed: Signal::new(),
            row_order_changed: Signal::new(),
        }
    }

    /// Run `insert_fn` inside an insert bracket.
    pub fn emit_rows_inserted<F, R>(&self, parent: ModelIndex, first: usize, last: usize, insert_fn: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.rows_about_to_be_inserted.emit((parent.clone(), first, last));
        let result = insert_fn();
        self.rows_inserted.emit((parent, first, last));
        result
    }

    /// Run `remove_fn` inside a remove bracket.
    pub fn emit_rows_removed<F, R>(&self, parent: ModelIndex, first: usize, last: usize, remove_fn: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.rows_about_to_be_removed.emit((parent.clone(), first, last));
        let result = remove_fn();
        self.rows_removed.emit((parent, first, last));
        result
    }

    /// Run `reset_fn` inside a reset bracket.
    pub fn emit_reset<F, R>(&self, reset_fn: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.model_about_to_reset.emit(());
        let result = reset_fn();
        self.model_reset.emit(());
        result
    }

    /// Notify a single changed cell for both roles.
    pub fn emit_data_changed_single(&self, index: ModelIndex) {
        self.data_changed
            .emit((index.clone(), index, vec![ItemRole::Display, ItemRole::Edit]));
    }

    /// Notify a changed span of cells for both roles.
    pub fn emit_data_changed(&self, top_left: ModelIndex, bottom_right: ModelIndex) {
        self.data_changed
            .emit((top_left, bottom_right, vec![ItemRole::Display, ItemRole::Edit]));
    }
}
