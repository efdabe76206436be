//! Text formatting and parsing of property values.
//!
//! Display text is canonical: sizes as `"W x H"`, points as `"(X, Y)"` and
//! rectangles as `"[(X, Y), W x H]"`. Parsing accepts a looser grammar:
//!
//! | Kind          | Accepted input                                     |
//! |---------------|----------------------------------------------------|
//! | size, point   | `"(3, 4)"`, `"3 x 4"`, `"3,4"`, `"3 4"`            |
//! | rectangle     | `"[(0, 0), 3 x 3]"`, `"0,0,3,3"`, `"0 0 3 3"`      |
//! | float         | any `f64` literal, including scientific notation  |
//!
//! The whole text must match and every numeric field must parse, otherwise
//! the parse is rejected and nothing is written.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use horizon_inspector_core::{Enumerator, Point, PointF, Rect, RectF, Size, SizeF, Value, ValueKind};

/// Errors produced while parsing edit text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The text does not match the grammar of the kind.
    #[error("'{text}' is not a valid {kind} value")]
    Malformed { kind: ValueKind, text: String },

    /// A numeric field matched the grammar but is not a number.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// The text names no key of the enumerator.
    #[error("unknown key '{key}' for enumeration {enumeration}")]
    UnknownEnumKey { enumeration: String, key: String },

    /// Values of this kind are not edited as text.
    #[error("{0} values cannot be parsed from text")]
    Unsupported(ValueKind),

    #[error("invalid pattern: {0}")]
    Pattern(String),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

const INT: &str = r"([+-]?\d+)";
const FLOAT: &str = r"([0-9+\-.eE]+)";

fn pair_pattern(number: &str) -> String {
    format!(r"^\s*\(?\s*{number}\s*[x,\s]\s*{number}\s*\)?\s*$")
}

fn rect_pattern(number: &str) -> String {
    format!(
        r"^\s*\[?\s*\(?\s*{number}\s*[,\s]\s*{number}\s*\)?\s*[,\s]\s*\(?\s*{number}\s*[x,\s]\s*{number}\s*\)?\s*\]?\s*$"
    )
}

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static INT_PAIR: Pattern = LazyLock::new(|| Regex::new(&pair_pattern(INT)));
static FLOAT_PAIR: Pattern = LazyLock::new(|| Regex::new(&pair_pattern(FLOAT)));
static INT_RECT: Pattern = LazyLock::new(|| Regex::new(&rect_pattern(INT)));
static FLOAT_RECT: Pattern = LazyLock::new(|| Regex::new(&rect_pattern(FLOAT)));

/// Match `text` against `pattern` and parse every capture group.
fn captures<T: std::str::FromStr>(pattern: &Pattern, kind: ValueKind, text: &str) -> CodecResult<Vec<T>> {
    let regex = pattern
        .as_ref()
        .map_err(|err| CodecError::Pattern(err.to_string()))?;
    let caps: Captures<'_> = regex.captures(text).ok_or_else(|| CodecError::Malformed {
        kind,
        text: text.to_string(),
    })?;
    caps.iter()
        .skip(1)
        .flatten()
        .map(|field| {
            field
                .as_str()
                .parse::<T>()
                .map_err(|_| CodecError::InvalidNumber(field.as_str().to_string()))
        })
        .collect()
}

fn two<T: Copy>(fields: &[T]) -> (T, T) {
    (fields[0], fields[1])
}

fn four<T: Copy>(fields: &[T]) -> (T, T, T, T) {
    (fields[0], fields[1], fields[2], fields[3])
}

pub fn parse_size(text: &str) -> CodecResult<Size> {
    let (width, height) = two(&captures::<i32>(&INT_PAIR, ValueKind::Size, text)?);
    Ok(Size::new(width, height))
}

pub fn parse_size_f(text: &str) -> CodecResult<SizeF> {
    let (width, height) = two(&captures::<f64>(&FLOAT_PAIR, ValueKind::SizeF, text)?);
    Ok(SizeF::new(width, height))
}

pub fn parse_point(text: &str) -> CodecResult<Point> {
    let (x, y) = two(&captures::<i32>(&INT_PAIR, ValueKind::Point, text)?);
    Ok(Point::new(x, y))
}

pub fn parse_point_f(text: &str) -> CodecResult<PointF> {
    let (x, y) = two(&captures::<f64>(&FLOAT_PAIR, ValueKind::PointF, text)?);
    Ok(PointF::new(x, y))
}

pub fn parse_rect(text: &str) -> CodecResult<Rect> {
    let (x, y, width, height) = four(&captures::<i32>(&INT_RECT, ValueKind::Rect, text)?);
    Ok(Rect::new(x, y, width, height))
}

pub fn parse_rect_f(text: &str) -> CodecResult<RectF> {
    let (x, y, width, height) = four(&captures::<f64>(&FLOAT_RECT, ValueKind::RectF, text)?);
    Ok(RectF::new(x, y, width, height))
}

/// Parse a floating point literal. Surrounding whitespace is ignored.
pub fn parse_float(text: &str) -> CodecResult<f64> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| CodecError::InvalidNumber(trimmed.to_string()))
}

/// Map an enumerator key back to its integer value.
pub fn parse_enum_key(enumerator: &Enumerator, key: &str) -> CodecResult<i64> {
    enumerator
        .value_for_key(key)
        .ok_or_else(|| CodecError::UnknownEnumKey {
            enumeration: enumerator.name().to_string(),
            key: key.to_string(),
        })
}

/// Parse `text` as a value of `kind`.
pub fn parse_as(kind: ValueKind, text: &str) -> CodecResult<Value> {
    Ok(match kind {
        ValueKind::Int => Value::Int(
            text.trim()
                .parse::<i64>()
                .map_err(|_| CodecError::InvalidNumber(text.trim().to_string()))?,
        ),
        ValueKind::Float => Value::Float(parse_float(text)?),
        ValueKind::String => Value::String(text.to_string()),
        ValueKind::Size => Value::Size(parse_size(text)?),
        ValueKind::SizeF => Value::SizeF(parse_size_f(text)?),
        ValueKind::Point => Value::Point(parse_point(text)?),
        ValueKind::PointF => Value::PointF(parse_point_f(text)?),
        ValueKind::Rect => Value::Rect(parse_rect(text)?),
        ValueKind::RectF => Value::RectF(parse_rect_f(text)?),
        other @ (ValueKind::None | ValueKind::Bool | ValueKind::Action) => {
            return Err(CodecError::Unsupported(other));
        }
    })
}

/// Canonical display text of a value.
///
/// Integers with an enumerator display their key, or `""` when the value
/// has none.
///
/// ```
/// use horizon_inspector::model::codec;
/// use horizon_inspector_core::{Rect, SizeF, Value};
///
/// assert_eq!(codec::format(&Value::Rect(Rect::new(0, 0, 3, 3)), None), "[(0, 0), 3 x 3]");
/// assert_eq!(codec::format(&Value::SizeF(SizeF::new(1.5, 2.0)), None), "1.5 x 2");
/// ```
pub fn format(value: &Value, enumerator: Option<&Enumerator>) -> String {
    match value {
        Value::None => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => match enumerator.filter(|e| !e.is_empty()) {
            Some(enumerator) => enumerator.key_for_value(*i).unwrap_or_default().to_string(),
            None => i.to_string(),
        },
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Size(s) => format!("{} x {}", s.width, s.height),
        Value::SizeF(s) => format!("{} x {}", s.width, s.height),
        Value::Point(p) => format!("({}, {})", p.x, p.y),
        Value::PointF(p) => format!("({}, {})", p.x, p.y),
        Value::Rect(r) => format!("[({}, {}), {} x {}]", r.x(), r.y(), r.width(), r.height()),
        Value::RectF(r) => format!("[({}, {}), {} x {}]", r.left(), r.top(), r.width(), r.height()),
        Value::Action(action) => action.text().to_string(),
    }
}
