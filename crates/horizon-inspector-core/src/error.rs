//! Error types for the object substrate.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors reported by [`ObjectSubstrate`](crate::ObjectSubstrate) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// The object ID is invalid or the object has been destroyed.
    #[error("invalid or destroyed object id")]
    InvalidObjectId,

    /// Setting this parent would create a cycle in the object tree.
    #[error("setting this parent would create a circular reference")]
    CircularParentage,

    /// No class with this name has been registered.
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    /// The named property does not exist on the object.
    #[error("property '{0}' not found")]
    PropertyNotFound(String),

    /// The named property is declared read-only.
    #[error("property '{0}' is read-only")]
    PropertyReadOnly(String),

    /// A value of the wrong kind was supplied for a declared property.
    #[error("property '{name}' expects {expected}, got {actual}")]
    PropertyTypeMismatch {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// A requested child order is not a permutation of the current children.
    #[error("child order is not a permutation of the current children")]
    InvalidChildOrder,

    /// The substrate does not support this operation.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl ObjectError {
    /// Shorthand for a type mismatch on `name`.
    pub fn type_mismatch(name: impl Into<String>, expected: ValueKind, actual: ValueKind) -> Self {
        Self::PropertyTypeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }
}

/// Result alias for substrate operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;
