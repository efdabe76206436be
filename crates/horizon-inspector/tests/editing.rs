//! Integration tests for value text and the editing delegate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use horizon_inspector::model::codec;
use horizon_inspector::model::{
    CellEditor, CheckState, EditorKind, EditorState, ItemFlags, ItemModel, ItemRole, ModelIndex,
    MouseButton, MouseEvent, MouseEventKind, ObjectTableModel, PaintInstruction, PropertyDelegate,
    StyleOptionViewItem,
};
use horizon_inspector_core::{
    Action, ClassInfo, Enumerator, ObjectId, ObjectSubstrate, Point, PointF, PropertyMeta, Rect,
    RectF, SharedObjectRegistry, Size, SizeF, Value, ValueKind,
};

fn setup() -> (Arc<SharedObjectRegistry>, Vec<ObjectId>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let registry = Arc::new(SharedObjectRegistry::new());
    let mode = Arc::new(Enumerator::new("Mode", [("Off", 0), ("Eco", 1), ("Boost", 2)]));
    registry
        .register_class(
            ClassInfo::new("Heater")
                .property(PropertyMeta::new("enabled", ValueKind::Bool), false)
                .property(PropertyMeta::new("faulted", ValueKind::Bool).read_only(), false)
                .property(PropertyMeta::new("mode", ValueKind::Int).with_enumerator(mode), 1)
                .property(PropertyMeta::new("footprint", ValueKind::Rect), Rect::new(0, 0, 1, 1)),
        )
        .unwrap();
    let heaters = (0..2).map(|_| registry.create("Heater", None).unwrap()).collect();
    (registry, heaters)
}

fn cell_rect() -> RectF {
    RectF::new(0.0, 0.0, 120.0, 20.0)
}

#[test]
fn test_loose_rect_text_matches_canonical_text() {
    let loose = codec::parse_as(ValueKind::Rect, "0,0,3,3");
    let canonical = codec::parse_as(ValueKind::Rect, "[(0, 0), 3 x 3]");
    assert_eq!(loose, canonical);
    assert_eq!(loose, Ok(Value::Rect(Rect::new(0, 0, 3, 3))));
    assert_eq!(codec::format(&Value::Rect(Rect::new(0, 0, 3, 3)), None), "[(0, 0), 3 x 3]");

    for value in [
        Value::Size(Size::new(640, -480)),
        Value::SizeF(SizeF::new(-0.5, 2.5e-9)),
        Value::Point(Point::new(-3, 7)),
        Value::PointF(PointF::new(-1.5, 1e-7)),
        Value::Rect(Rect::new(-10, 20, 0, 5)),
        Value::RectF(RectF::new(1e20, -0.25, 3.5, 1e-9)),
    ] {
        let text = codec::format(&value, None);
        assert_eq!(codec::parse_as(value.kind(), &text), Ok(value.clone()), "{text}");
    }
    assert!(codec::parse_as(ValueKind::Rect, "0,0,3").is_err());
}

#[test]
fn test_bool_click_toggles_and_refreshes_row() {
    let (registry, heaters) = setup();
    let model = ObjectTableModel::builder(registry.clone())
        .objects(heaters.clone())
        .properties("mode, enabled")
        .build();

    let ranges = Arc::new(Mutex::new(Vec::new()));
    let sink = ranges.clone();
    model
        .signals()
        .data_changed
        .connect(move |(top_left, bottom_right, _)| sink.lock().push((top_left.clone(), bottom_right.clone())));

    let delegate = PropertyDelegate::new();
    let index = model.index(1, 1, &ModelIndex::invalid());
    let option = StyleOptionViewItem::new(cell_rect(), index.clone()).with_flags(model.flags(&index));

    let press = MouseEvent::new(MouseEventKind::Press, MouseButton::Primary, PointF::new(5.0, 5.0));
    assert!(!delegate.editor_event(&model, &option, &press));
    let outside = MouseEvent::click(PointF::new(130.0, 5.0));
    assert!(!delegate.editor_event(&model, &option, &outside));
    assert!(ranges.lock().is_empty());

    assert!(delegate.editor_event(&model, &option, &MouseEvent::click(PointF::new(5.0, 5.0))));
    assert_eq!(registry.property(heaters[1], "enabled"), Ok(Value::Bool(true)));
    assert_eq!(registry.property(heaters[0], "enabled"), Ok(Value::Bool(false)));

    let ranges = ranges.lock();
    let (top_left, bottom_right) = ranges.last().unwrap();
    assert_eq!((top_left.row(), top_left.column()), (1, 0));
    assert_eq!((bottom_right.row(), bottom_right.column()), (1, 1));
}

#[test]
fn test_paint_takes_checkbox_state_from_the_model() {
    let (registry, heaters) = setup();
    let model = ObjectTableModel::builder(registry.clone())
        .objects(heaters.clone())
        .properties("enabled, faulted")
        .build();
    let delegate = PropertyDelegate::new();
    let root = ModelIndex::invalid();

    // A fresh option carries no editable flag of its own.
    let writable = StyleOptionViewItem::new(cell_rect(), model.index(0, 0, &root));
    assert!(!writable.flags.editable);
    let PaintInstruction::CheckBox { state, enabled, .. } = delegate.paint(&model, &writable) else {
        panic!("boolean cell painted without a checkbox");
    };
    assert_eq!(state, CheckState::Unchecked);
    assert!(enabled);

    let read_only = StyleOptionViewItem::new(cell_rect(), model.index(0, 1, &root)).with_flags(ItemFlags::editable());
    let PaintInstruction::CheckBox { enabled, .. } = delegate.paint(&model, &read_only) else {
        panic!("boolean cell painted without a checkbox");
    };
    assert!(!enabled);
}

#[test]
fn test_enum_cells_commit_through_the_editor() {
    let (registry, heaters) = setup();
    let model = ObjectTableModel::builder(registry.clone())
        .objects(heaters.clone())
        .properties("mode")
        .build();
    let delegate = PropertyDelegate::new();
    let index = model.index(0, 0, &ModelIndex::invalid());
    assert_eq!(delegate.display_text(&model, &index), "Eco");

    let mut editor = CellEditor::default();
    let kind = editor.open(&model, &index).cloned();
    assert_eq!(
        kind,
        Some(EditorKind::Choice {
            keys: vec!["Off".into(), "Eco".into(), "Boost".into()],
            current: Some(1),
        })
    );
    assert!(editor.commit(&model, "Boost"));
    assert_eq!(editor.finish(), EditorState::Committed(Value::Int(2)));
    assert_eq!(*editor.state(), EditorState::Idle);
    assert_eq!(registry.property(heaters[0], "mode"), Ok(Value::Int(2)));

    editor.open(&model, &index);
    assert!(!editor.commit(&model, "Turbo"));
    assert_eq!(editor.finish(), EditorState::Discarded);
    assert_eq!(registry.property(heaters[0], "mode"), Ok(Value::Int(2)));
}

#[test]
fn test_geometry_cells_parse_loose_text() {
    let (registry, heaters) = setup();
    let model = ObjectTableModel::builder(registry.clone())
        .objects(heaters.clone())
        .properties("footprint")
        .build();
    let delegate = PropertyDelegate::new();
    let index = model.index(0, 0, &ModelIndex::invalid());

    assert_eq!(
        delegate.create_editor(&model, &index),
        EditorKind::LineEdit {
            text: "[(0, 0), 1 x 1]".to_string()
        }
    );
    assert!(delegate.set_model_data(&model, &index, "2 3 40 50"));
    assert_eq!(registry.property(heaters[0], "footprint"), Ok(Value::Rect(Rect::new(2, 3, 40, 50))));

    assert!(!delegate.set_model_data(&model, &index, "2 3 forty 50"));
    assert_eq!(model.data(&index, ItemRole::Display), Value::Rect(Rect::new(2, 3, 40, 50)));
}

#[test]
fn test_action_cells_trigger_on_click() {
    let (registry, heaters) = setup();
    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    registry
        .set_dynamic_property(
            heaters[0],
            "reset",
            Value::from(Action::new("Reset", move || flag.store(true, Ordering::SeqCst))),
        )
        .unwrap();

    let model = ObjectTableModel::builder(registry.clone())
        .objects([heaters[0]])
        .properties("reset")
        .build();
    let delegate = PropertyDelegate::new();
    let index = model.index(0, 0, &ModelIndex::invalid());
    assert_eq!(delegate.create_editor(&model, &index), EditorKind::None);

    let option = StyleOptionViewItem::new(cell_rect(), index);
    let double_click = MouseEvent::new(MouseEventKind::DoubleClick, MouseButton::Primary, PointF::new(1.0, 1.0));
    assert!(!delegate.editor_event(&model, &option, &double_click));
    assert!(!fired.load(Ordering::SeqCst));

    assert!(delegate.editor_event(&model, &option, &MouseEvent::click(PointF::new(1.0, 1.0))));
    assert!(fired.load(Ordering::SeqCst));
}
