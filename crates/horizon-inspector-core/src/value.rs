//! Dynamically typed property values.
//!
//! [`Value`] is the currency exchanged between the object substrate and the
//! models: every property read returns one, every write takes one. The
//! runtime [`ValueKind`] of a value (not the declared type of the property)
//! is what editors dispatch on.

use std::fmt;
use std::sync::Arc;

use crate::geometry::{Point, PointF, Rect, RectF, Size, SizeF};

/// Runtime kind tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    String,
    Size,
    SizeF,
    Point,
    PointF,
    Rect,
    RectF,
    Action,
}

impl ValueKind {
    /// Human-readable type name, used in diagnostics and error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::None => "none",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Size => "size",
            ValueKind::SizeF => "sizef",
            ValueKind::Point => "point",
            ValueKind::PointF => "pointf",
            ValueKind::Rect => "rect",
            ValueKind::RectF => "rectf",
            ValueKind::Action => "action",
        }
    }

    /// Returns `true` for the compound geometric kinds.
    pub fn is_geometric(self) -> bool {
        matches!(
            self,
            ValueKind::Size
                | ValueKind::SizeF
                | ValueKind::Point
                | ValueKind::PointF
                | ValueKind::Rect
                | ValueKind::RectF
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A labelled callback shown as a push button in a property cell.
///
/// Two actions compare equal only when they share the same callback.
#[derive(Clone)]
pub struct Action {
    text: String,
    trigger: Arc<dyn Fn() + Send + Sync>,
}

impl Action {
    /// Create an action with a button label and a callback.
    pub fn new<F>(text: impl Into<String>, trigger: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            text: text.into(),
            trigger: Arc::new(trigger),
        }
    }

    /// The button label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Invoke the callback.
    pub fn trigger(&self) {
        (self.trigger)();
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("text", &self.text).finish_non_exhaustive()
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.trigger, &other.trigger) && self.text == other.text
    }
}

/// A dynamically typed property value.
///
/// # Example
///
/// ```
/// use horizon_inspector_core::{Value, ValueKind};
/// use horizon_inspector_core::geometry::Size;
///
/// let value = Value::from(Size::new(3, 4));
/// assert_eq!(value.kind(), ValueKind::Size);
/// assert_eq!(value.as_size(), Some(Size::new(3, 4)));
/// assert!(Value::None.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value. Returned for unresolved addresses.
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Size(Size),
    SizeF(SizeF),
    Point(Point),
    PointF(PointF),
    Rect(Rect),
    RectF(RectF),
    Action(Action),
}

impl Value {
    /// The runtime kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Size(_) => ValueKind::Size,
            Value::SizeF(_) => ValueKind::SizeF,
            Value::Point(_) => ValueKind::Point,
            Value::PointF(_) => ValueKind::PointF,
            Value::Rect(_) => ValueKind::Rect,
            Value::RectF(_) => ValueKind::RectF,
            Value::Action(_) => ValueKind::Action,
        }
    }

    /// Returns `true` if this is `Value::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if this holds a value.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view. Floats are not truncated.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Floating point view. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match self {
            Value::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_size_f(&self) -> Option<SizeF> {
        match self {
            Value::SizeF(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Value::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_point_f(&self) -> Option<PointF> {
        match self {
            Value::PointF(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Value::Rect(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_rect_f(&self) -> Option<RectF> {
        match self {
            Value::RectF(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Value::Action(a) => Some(a),
            _ => None,
        }
    }

    /// Convert this value to `kind` where the conversion is lossless in
    /// intent: same kind, int to float, integral float to int, and integer
    /// geometry to its floating variant.
    ///
    /// Returns `None` when no such conversion exists.
    pub fn coerce_to(&self, kind: ValueKind) -> Option<Value> {
        if self.kind() == kind {
            return Some(self.clone());
        }
        match (self, kind) {
            (Value::Int(n), ValueKind::Float) => Some(Value::Float(*n as f64)),
            (Value::Float(n), ValueKind::Int) if n.fract() == 0.0 && n.is_finite() => {
                Some(Value::Int(*n as i64))
            }
            (Value::Size(s), ValueKind::SizeF) => Some(Value::SizeF((*s).into())),
            (Value::Point(p), ValueKind::PointF) => Some(Value::PointF((*p).into())),
            (Value::Rect(r), ValueKind::RectF) => Some(Value::RectF((*r).into())),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Size> for Value {
    fn from(s: Size) -> Self {
        Value::Size(s)
    }
}

impl From<SizeF> for Value {
    fn from(s: SizeF) -> Self {
        Value::SizeF(s)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Point(p)
    }
}

impl From<PointF> for Value {
    fn from(p: PointF) -> Self {
        Value::PointF(p)
    }
}

impl From<Rect> for Value {
    fn from(r: Rect) -> Self {
        Value::Rect(r)
    }
}

impl From<RectF> for Value {
    fn from(r: RectF) -> Self {
        Value::RectF(r)
    }
}

impl From<Action> for Value {
    fn from(a: Action) -> Self {
        Value::Action(a)
    }
}

impl From<Option<String>> for Value {
    fn from(opt: Option<String>) -> Self {
        match opt {
            Some(s) => Value::String(s),
            None => Value::None,
        }
    }
}
