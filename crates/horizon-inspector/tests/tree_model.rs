//! Integration tests for the object tree and single-object models.

use std::sync::Arc;

use horizon_inspector::model::{
    DepthLimit, ItemModel, ItemRole, ModelIndex, ObjectPropertyModel, ObjectTreeModel, PropertyModel,
};
use horizon_inspector_core::{
    ClassInfo, ObjectId, ObjectSubstrate, PropertyMeta, SharedObjectRegistry, Value, ValueKind,
};

struct Rig {
    registry: Arc<SharedObjectRegistry>,
    body: ObjectId,
    arm: ObjectId,
    hand: ObjectId,
}

// body(Joint) -> [arm(Joint) -> [hand(Joint)], sensor(Sensor)]
fn setup() -> Rig {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let registry = Arc::new(SharedObjectRegistry::new());
    registry
        .register_class(ClassInfo::new("Joint").property(PropertyMeta::new("angle", ValueKind::Float), 0.0))
        .unwrap();
    registry
        .register_class(ClassInfo::new("Sensor").property(PropertyMeta::new("range", ValueKind::Int), 10))
        .unwrap();

    let body = registry.create("Joint", None).unwrap();
    let arm = registry.create("Joint", Some(body)).unwrap();
    let sensor = registry.create("Sensor", Some(body)).unwrap();
    let hand = registry.create("Joint", Some(arm)).unwrap();
    registry.set_object_name(body, "body").unwrap();
    registry.set_object_name(arm, "arm").unwrap();
    registry.set_object_name(sensor, "sensor").unwrap();
    registry.set_object_name(hand, "hand").unwrap();
    Rig {
        registry,
        body,
        arm,
        hand,
    }
}

fn child_labels(model: &ObjectTreeModel, parent: &ModelIndex) -> Vec<Value> {
    (0..model.row_count(parent))
        .map(|row| model.data(&model.index(row, 0, parent), ItemRole::Display))
        .collect()
}

#[test]
fn test_depth_limits_descendants() {
    let rig = setup();
    let model = ObjectTreeModel::new(rig.registry.clone());
    model.set_object(Some(rig.body));

    model.set_max_depth(0);
    assert_eq!(model.max_depth(), DepthLimit::Levels(0));
    assert_eq!(child_labels(&model, &ModelIndex::invalid()), ["objectName", "angle"].map(Value::from));

    model.set_max_depth(1);
    let top = ModelIndex::invalid();
    assert_eq!(
        child_labels(&model, &top),
        ["objectName", "angle", "Joint", "Sensor"].map(Value::from)
    );
    let arm = model.index(2, 0, &top);
    assert_eq!(model.object_at(&arm), Some(rig.arm));
    // Properties of the arm, but not the hand.
    assert_eq!(model.row_count(&arm), 2);

    model.set_max_depth(-1);
    let arm = model.index(2, 0, &top);
    assert_eq!(model.row_count(&arm), 3);
    let hand = model.index(2, 0, &arm);
    assert_eq!(model.object_at(&hand), Some(rig.hand));
    assert_eq!(model.parent(&hand), arm);
}

#[test]
fn test_children_are_grouped_by_type() {
    let rig = setup();
    // A second joint created after the sensor still lists next to the arm.
    rig.registry.create("Joint", Some(rig.body)).unwrap();

    let model = ObjectTreeModel::new(rig.registry.clone());
    model.set_object(Some(rig.body));
    assert_eq!(
        child_labels(&model, &ModelIndex::invalid()),
        ["objectName", "angle", "Joint", "Joint", "Sensor"].map(Value::from)
    );
}

#[test]
fn test_values_are_written_through_the_owner() {
    let rig = setup();
    let model = ObjectTreeModel::new(rig.registry.clone());
    model.set_object(Some(rig.body));

    let arm = model.index(2, 0, &ModelIndex::invalid());
    let angle = model.index(1, 1, &arm);
    assert!(model.flags(&angle).editable);
    assert!(!model.flags(&model.index(1, 0, &arm)).editable);
    assert!(model.set_data(&angle, Value::Float(45.0), ItemRole::Edit));
    assert_eq!(rig.registry.property(rig.arm, "angle"), Ok(Value::Float(45.0)));

    let arm_value = model.index(2, 1, &ModelIndex::invalid());
    assert_eq!(model.data(&arm_value, ItemRole::Display), Value::from("arm"));
    assert!(model.set_data(&arm_value, Value::from("left_arm"), ItemRole::Edit));
    assert_eq!(rig.registry.object_name(rig.arm), Ok("left_arm".to_string()));
}

#[test]
fn test_refresh_picks_up_structure_changes() {
    let rig = setup();
    let model = ObjectTreeModel::new(rig.registry.clone());
    model.set_object(Some(rig.body));
    let stale = model.index(2, 0, &ModelIndex::invalid());

    rig.registry.destroy(rig.arm).unwrap();
    model.refresh();
    assert!(model.object_at(&stale).is_none());
    assert_eq!(
        child_labels(&model, &ModelIndex::invalid()),
        ["objectName", "angle", "Sensor"].map(Value::from)
    );
}

#[test]
fn test_single_object_rows_follow_dotted_names() {
    let rig = setup();
    let model = ObjectPropertyModel::new(rig.registry.clone());
    model.set_object(Some(rig.body));
    model.set_properties("angle: Tilt, arm.hand.angle, arm.missing.angle");
    assert_eq!(model.row_count(&ModelIndex::invalid()), 3);

    let nested = model.index(1, 0, &ModelIndex::invalid());
    assert_eq!(model.object_at(&nested), Some(rig.hand));
    assert!(model.set_data(&nested, Value::Float(-5.5), ItemRole::Edit));
    assert_eq!(rig.registry.property(rig.hand, "angle"), Ok(Value::Float(-5.5)));

    let missing = model.index(2, 0, &ModelIndex::invalid());
    assert_eq!(model.data(&missing, ItemRole::Display), Value::None);
    assert!(!model.flags(&missing).enabled);
}
