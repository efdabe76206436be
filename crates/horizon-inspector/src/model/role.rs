//! Data roles and check state.
//!
//! Property models hand out the same [`Value`](horizon_inspector_core::Value)
//! for both roles; views use `Display` to render and `Edit` to seed editors.
//! Writes are only accepted for `Edit`.

/// What aspect of a cell is being requested or set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemRole {
    /// Value to render.
    #[default]
    Display,
    /// Value to edit.
    Edit,
}

/// Checkbox state for boolean cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    /// Neither checked nor unchecked, e.g. a boolean cell with no value.
    PartiallyChecked,
    Checked,
}

impl CheckState {
    /// Returns `true` for `Checked` and `PartiallyChecked`.
    pub fn is_checked(&self) -> bool {
        !matches!(self, CheckState::Unchecked)
    }

    /// `Unchecked` becomes `Checked`; anything else becomes `Unchecked`.
    pub fn toggle(&self) -> CheckState {
        match self {
            CheckState::Unchecked => CheckState::Checked,
            CheckState::PartiallyChecked | CheckState::Checked => CheckState::Unchecked,
        }
    }
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }
}

impl From<Option<bool>> for CheckState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(CheckState::PartiallyChecked, CheckState::from)
    }
}
