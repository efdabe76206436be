//! Value-aware editing and painting of property cells.
//!
//! The delegate dispatches on the runtime kind of the value currently in a
//! cell, not on the declared property type:
//!
//! - **Bool**: no editor. Painted as a checkbox; a primary-button release
//!   inside the cell toggles the value.
//! - **Int with an enumerator**: a choice list of the enumerator's keys.
//! - **Float**: a line edit accepting any floating point literal.
//! - **Size, point and rectangle kinds**: a line edit seeded with the
//!   canonical text, parsed back with the loose grammar of [`codec`].
//! - **Action**: painted as a push button, triggered on release.
//! - Anything else uses the host's default editor.
//!
//! Painting and committing are pure functions of the cell value; a
//! [`CellEditor`] tracks the lifecycle of one open editor.

use horizon_inspector_core::{Enumerator, PointF, PropertyMeta, RectF, SizeF, Value, ValueKind};

use super::codec;
use super::index::ModelIndex;
use super::property_model::PropertyModel;
use super::role::{CheckState, ItemRole};
use super::targets;
use super::traits::ItemFlags;

/// Geometry and capabilities of the cell being painted or clicked.
#[derive(Debug, Clone)]
pub struct StyleOptionViewItem {
    /// The cell rectangle.
    pub rect: RectF,
    pub index: ModelIndex,
    pub flags: ItemFlags,
    /// Size of the checkbox indicator.
    pub check_size: SizeF,
}

impl StyleOptionViewItem {
    pub fn new(rect: RectF, index: ModelIndex) -> Self {
        Self {
            rect,
            index,
            flags: ItemFlags::new(),
            check_size: SizeF::new(16.0, 16.0),
        }
    }

    pub fn with_flags(mut self, flags: ItemFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_check_size(mut self, size: SizeF) -> Self {
        self.check_size = size;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    DoubleClick,
}

/// A mouse event in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub button: MouseButton,
    pub position: PointF,
}

impl MouseEvent {
    pub fn new(kind: MouseEventKind, button: MouseButton, position: PointF) -> Self {
        Self { kind, button, position }
    }

    /// Primary-button release at `position`.
    pub fn click(position: PointF) -> Self {
        Self::new(MouseEventKind::Release, MouseButton::Primary, position)
    }
}

/// The editor a cell asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKind {
    /// No editor; the cell is edited through mouse interaction.
    None,
    /// Free text seeded with `text`.
    LineEdit { text: String },
    /// A closed list of enumerator keys.
    Choice { keys: Vec<String>, current: Option<usize> },
    /// The host's default editor for the kind, seeded with `text`.
    Default { text: String },
}

/// What to draw for a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintInstruction {
    CheckBox { rect: RectF, state: CheckState, enabled: bool },
    Text { text: String },
    PushButton { rect: RectF, text: String },
    /// Draw the display text the default way.
    Default,
}

fn enumerator_of(meta: Option<&PropertyMeta>) -> Option<&Enumerator> {
    meta.filter(|m| m.is_enum())
        .and_then(|m| m.enumerator.as_deref())
}

/// Stateless editing logic for property cells.
#[derive(Debug, Clone, Default)]
pub struct PropertyDelegate;

impl PropertyDelegate {
    pub fn new() -> Self {
        Self
    }

    /// The editor to open for `index`.
    pub fn create_editor<M: PropertyModel + ?Sized>(&self, model: &M, index: &ModelIndex) -> EditorKind {
        let value = model.data(index, ItemRole::Display);
        let meta = model.property_meta_at(index);
        Self::editor_for(&value, meta.as_ref())
    }

    /// Editor kind for a value with optional declared metadata.
    pub fn editor_for(value: &Value, meta: Option<&PropertyMeta>) -> EditorKind {
        match value.kind() {
            ValueKind::Bool | ValueKind::Action => EditorKind::None,
            ValueKind::Int => match (enumerator_of(meta), value.as_int()) {
                (Some(enumerator), Some(current)) => {
                    let keys: Vec<String> = enumerator.keys().map(str::to_string).collect();
                    let current = enumerator
                        .key_for_value(current)
                        .and_then(|key| keys.iter().position(|k| k == key));
                    EditorKind::Choice { keys, current }
                }
                _ => EditorKind::Default {
                    text: codec::format(value, None),
                },
            },
            kind if kind == ValueKind::Float || kind.is_geometric() => EditorKind::LineEdit {
                text: codec::format(value, None),
            },
            _ => EditorKind::Default {
                text: codec::format(value, None),
            },
        }
    }

    /// Display text for `index`. Enumerated integers show their key.
    pub fn display_text<M: PropertyModel + ?Sized>(&self, model: &M, index: &ModelIndex) -> String {
        let value = model.data(index, ItemRole::Display);
        let meta = model.property_meta_at(index);
        codec::format(&value, enumerator_of(meta.as_ref()))
    }

    /// What to draw for the cell described by `option`. Capabilities come
    /// from the model's flags for the cell, not from `option.flags`.
    pub fn paint<M: PropertyModel + ?Sized>(&self, model: &M, option: &StyleOptionViewItem) -> PaintInstruction {
        let value = model.data(&option.index, ItemRole::Display);
        let meta = model.property_meta_at(&option.index);
        let option = option.clone().with_flags(model.flags(&option.index));
        Self::paint_value(&value, meta.as_ref(), &option)
    }

    pub fn paint_value(value: &Value, meta: Option<&PropertyMeta>, option: &StyleOptionViewItem) -> PaintInstruction {
        match value {
            Value::Bool(checked) => PaintInstruction::CheckBox {
                rect: option.rect.aligned_left(option.check_size),
                state: CheckState::from(*checked),
                enabled: option.flags.enabled && option.flags.editable,
            },
            Value::Int(_) => match enumerator_of(meta) {
                Some(enumerator) => PaintInstruction::Text {
                    text: codec::format(value, Some(enumerator)),
                },
                None => PaintInstruction::Default,
            },
            Value::Action(action) => PaintInstruction::PushButton {
                rect: option.rect,
                text: action.text().to_string(),
            },
            other if other.kind().is_geometric() => PaintInstruction::Text {
                text: codec::format(other, None),
            },
            _ => PaintInstruction::Default,
        }
    }

    /// Turn editor text into the value to write, or `None` to discard the
    /// edit.
    pub fn commit_value(current: &Value, meta: Option<&PropertyMeta>, text: &str) -> Option<Value> {
        let parsed = match current.kind() {
            ValueKind::None | ValueKind::Bool | ValueKind::Action => return None,
            ValueKind::Int => match enumerator_of(meta) {
                Some(enumerator) => codec::parse_enum_key(enumerator, text).map(Value::Int),
                None => codec::parse_as(ValueKind::Int, text),
            },
            kind => codec::parse_as(kind, text),
        };
        match parsed {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(target: targets::DELEGATE, %err, "edit discarded");
                None
            }
        }
    }

    /// Parse `text` for `index` and write it. Returns `false` when the text
    /// was rejected or the write failed; the model is unchanged then.
    pub fn set_model_data<M: PropertyModel + ?Sized>(&self, model: &M, index: &ModelIndex, text: &str) -> bool {
        let current = model.data(index, ItemRole::Edit);
        let meta = model.property_meta_at(index);
        match Self::commit_value(&current, meta.as_ref(), text) {
            Some(value) => model.set_data(index, value, ItemRole::Edit),
            None => false,
        }
    }

    /// Handle a mouse event on a cell. Returns `true` if it was consumed.
    ///
    /// A toggled boolean refreshes the whole row, since other columns may
    /// show the same value.
    pub fn editor_event<M: PropertyModel + ?Sized>(&self, model: &M, option: &StyleOptionViewItem, event: &MouseEvent) -> bool {
        if event.kind != MouseEventKind::Release
            || event.button != MouseButton::Primary
            || !option.rect.contains(event.position)
        {
            return false;
        }
        let index = &option.index;
        match model.data(index, ItemRole::Display) {
            Value::Bool(checked) => {
                if !model.set_data(index, Value::Bool(!checked), ItemRole::Edit) {
                    return false;
                }
                let last_column = model.column_count(&index.parent()).saturating_sub(1);
                model.signals().emit_data_changed(
                    model.sibling(index, index.row(), 0),
                    model.sibling(index, index.row(), last_column),
                );
                true
            }
            Value::Action(action) => {
                action.trigger();
                true
            }
            _ => false,
        }
    }
}

/// Lifecycle of a single cell editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    Idle,
    EditorOpen { index: ModelIndex, kind: EditorKind },
    Committed(Value),
    Discarded,
}

/// Drives one cell through `Idle -> EditorOpen -> Committed | Discarded -> Idle`.
#[derive(Debug, Clone)]
pub struct CellEditor {
    delegate: PropertyDelegate,
    state: EditorState,
}

impl Default for CellEditor {
    fn default() -> Self {
        Self::new(PropertyDelegate::new())
    }
}

impl CellEditor {
    pub fn new(delegate: PropertyDelegate) -> Self {
        Self {
            delegate,
            state: EditorState::Idle,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Open an editor for `index`. Cells that are not editable, or whose
    /// kind has no editor, stay idle.
    pub fn open<M: PropertyModel + ?Sized>(&mut self, model: &M, index: &ModelIndex) -> Option<&EditorKind> {
        if self.state != EditorState::Idle || !model.flags(index).editable {
            return None;
        }
        let kind = self.delegate.create_editor(model, index);
        if kind == EditorKind::None {
            return None;
        }
        self.state = EditorState::EditorOpen {
            index: index.clone(),
            kind,
        };
        match &self.state {
            EditorState::EditorOpen { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Commit `text` from the open editor. Returns `true` if a value was
    /// written.
    pub fn commit<M: PropertyModel + ?Sized>(&mut self, model: &M, text: &str) -> bool {
        let EditorState::EditorOpen { index, .. } = &self.state else {
            return false;
        };
        let index = index.clone();
        let current = model.data(&index, ItemRole::Edit);
        let meta = model.property_meta_at(&index);
        self.state = match PropertyDelegate::commit_value(&current, meta.as_ref(), text) {
            Some(value) if model.set_data(&index, value.clone(), ItemRole::Edit) => EditorState::Committed(value),
            _ => EditorState::Discarded,
        };
        matches!(self.state, EditorState::Committed(_))
    }

    /// Close the open editor without writing.
    pub fn cancel(&mut self) {
        if matches!(self.state, EditorState::EditorOpen { .. }) {
            self.state = EditorState::Discarded;
        }
    }

    /// Return to idle, yielding the final state of the edit.
    pub fn finish(&mut self) -> EditorState {
        std::mem::replace(&mut self.state, EditorState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_inspector_core::{Point, Size};
    use std::sync::Arc;

    fn option() -> StyleOptionViewItem {
        StyleOptionViewItem::new(RectF::new(0.0, 0.0, 100.0, 20.0), ModelIndex::invalid())
            .with_flags(ItemFlags::editable())
    }

    fn shape_meta() -> PropertyMeta {
        let shape = Arc::new(Enumerator::new("Shape", [("Square", 0), ("Round", 1)]));
        PropertyMeta::new("shape", ValueKind::Int).with_enumerator(shape)
    }

    #[test]
    fn test_editor_dispatch() {
        assert_eq!(PropertyDelegate::editor_for(&Value::Bool(true), None), EditorKind::None);
        assert_eq!(
            PropertyDelegate::editor_for(&Value::Float(0.5), None),
            EditorKind::LineEdit { text: "0.5".into() }
        );
        assert_eq!(
            PropertyDelegate::editor_for(&Value::Size(Size::new(3, 4)), None),
            EditorKind::LineEdit { text: "3 x 4".into() }
        );
        assert_eq!(
            PropertyDelegate::editor_for(&Value::Int(7), None),
            EditorKind::Default { text: "7".into() }
        );
        assert_eq!(
            PropertyDelegate::editor_for(&Value::Int(1), Some(&shape_meta())),
            EditorKind::Choice {
                keys: vec!["Square".into(), "Round".into()],
                current: Some(1),
            }
        );
    }

    #[test]
    fn test_paint_dispatch() {
        let checkbox = PropertyDelegate::paint_value(&Value::Bool(false), None, &option());
        assert_eq!(
            checkbox,
            PaintInstruction::CheckBox {
                rect: RectF::new(0.0, 2.0, 16.0, 16.0),
                state: CheckState::Unchecked,
                enabled: true,
            }
        );
        assert_eq!(
            PropertyDelegate::paint_value(&Value::Int(5), Some(&shape_meta()), &option()),
            PaintInstruction::Text { text: String::new() }
        );
        assert_eq!(
            PropertyDelegate::paint_value(&Value::Point(Point::new(1, 2)), None, &option()),
            PaintInstruction::Text { text: "(1, 2)".into() }
        );
        assert_eq!(PropertyDelegate::paint_value(&Value::Float(1.0), None, &option()), PaintInstruction::Default);
    }

    #[test]
    fn test_commit_value() {
        assert_eq!(PropertyDelegate::commit_value(&Value::Float(0.0), None, "2.5e2"), Some(Value::Float(250.0)));
        assert_eq!(PropertyDelegate::commit_value(&Value::Float(0.0), None, "abc"), None);
        assert_eq!(
            PropertyDelegate::commit_value(&Value::Int(0), Some(&shape_meta()), "Round"),
            Some(Value::Int(1))
        );
        assert_eq!(PropertyDelegate::commit_value(&Value::Int(0), Some(&shape_meta()), "Oval"), None);
        assert_eq!(PropertyDelegate::commit_value(&Value::Bool(true), None, "false"), None);
        assert_eq!(
            PropertyDelegate::commit_value(&Value::Size(Size::new(0, 0)), None, "(5, 6)"),
            Some(Value::Size(Size::new(5, 6)))
        );
    }
}
