//! Model coordinates.
//!
//! A [`ModelIndex`] names one cell of a model: a row and column under a
//! parent index. Flat models only ever hand out top-level indices; the tree
//! projection stores the arena slot of the node in the internal ID so it can
//! find the node again without walking the parent chain.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A (row, column, parent) coordinate within an [`ItemModel`](super::ItemModel).
///
/// Indices are snapshots. After a structural change or a reset, indices
/// obtained earlier must be requested again.
///
/// # Example
///
/// ```
/// use horizon_inspector::model::ModelIndex;
///
/// let top = ModelIndex::new(2, 1, ModelIndex::invalid());
/// assert!(top.is_valid());
/// assert!(!top.parent().is_valid());
///
/// let nested = ModelIndex::with_internal_id(0, 0, top.clone(), 7);
/// assert_eq!(nested.parent(), top);
/// assert_eq!(nested.internal_id(), 7);
/// assert_eq!(nested.depth(), 1);
/// ```
#[derive(Clone)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    parent: Option<Box<ModelIndex>>,
    /// Model-specific payload; the tree projection stores a node slot here.
    internal_id: u64,
    valid: bool,
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ModelIndex {
    /// The invalid index. Used as the root parent and for "no such cell".
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            parent: None,
            internal_id: 0,
            valid: false,
        }
    }

    /// A valid index with no internal ID.
    #[inline]
    pub fn new(row: usize, column: usize, parent: ModelIndex) -> Self {
        Self::with_internal_id(row, column, parent, 0)
    }

    /// A valid index carrying a model-specific internal ID.
    #[inline]
    pub fn with_internal_id(row: usize, column: usize, parent: ModelIndex, internal_id: u64) -> Self {
        Self {
            row,
            column,
            parent: parent.is_valid().then(|| Box::new(parent)),
            internal_id,
            valid: true,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// The parent index, or an invalid index for top-level cells.
    pub fn parent(&self) -> ModelIndex {
        self.parent
            .as_deref()
            .cloned()
            .unwrap_or_else(ModelIndex::invalid)
    }

    #[inline]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    #[inline]
    pub fn internal_id(&self) -> u64 {
        self.internal_id
    }

    /// Number of valid ancestors. Top-level cells have depth 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent.as_deref();
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent.as_deref();
        }
        depth
    }

    /// The same cell position with a different column, keeping the parent
    /// and internal ID.
    pub fn with_column(&self, column: usize) -> ModelIndex {
        if !self.valid {
            return ModelIndex::invalid();
        }
        Self {
            column,
            ..self.clone()
        }
    }
}

impl fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            f.debug_struct("ModelIndex")
                .field("row", &self.row)
                .field("column", &self.column)
                .field("depth", &self.depth())
                .field("internal_id", &self.internal_id)
                .finish()
        } else {
            f.write_str("ModelIndex(invalid)")
        }
    }
}

impl PartialEq for ModelIndex {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (false, false) => true,
            (true, true) => {
                self.row == other.row
                    && self.column == other.column
                    && self.internal_id == other.internal_id
                    && self.parent == other.parent
            }
            _ => false,
        }
    }
}

impl Eq for ModelIndex {}

impl Hash for ModelIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.row.hash(state);
            self.column.hash(state);
            self.internal_id.hash(state);
        }
    }
}
