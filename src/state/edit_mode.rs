use crate::data::{HabitData, HabitId};
use serde::Serialize;

/// Which affordances are live. `Renaming` is a sub-state of edit mode.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditState {
    #[default]
    View,
    Edit,
    Renaming { id: HabitId, buffer: String },
}

impl EditState {
    /// Edit mode or any of its sub-states.
    pub fn is_editing(&self) -> bool {
        !matches!(self, EditState::View)
    }

    pub fn can_toggle(&self) -> bool {
        matches!(self, EditState::View)
    }

    pub fn renaming(&self) -> Option<(&HabitId, &str)> {
        match self {
            EditState::Renaming { id, buffer } => Some((id, buffer.as_str())),
            _ => None,
        }
    }
}

/// View/edit state machine. Holds the rename target by id only; every access
/// re-checks that the habit still exists.
#[derive(Debug, Default, Clone)]
pub struct EditController {
    state: EditState,
}

impl EditController {
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// View -> Edit, or Edit/Renaming -> View. A pending rename is dropped.
    pub fn toggle_edit_mode(&mut self) {
        self.state = match self.state {
            EditState::View => EditState::Edit,
            EditState::Edit | EditState::Renaming { .. } => EditState::View,
        };
    }

    pub fn start_rename(&mut self, habits: &HabitData, id: &HabitId) -> bool {
        if self.state != EditState::Edit {
            return false;
        }
        match habits.get(id) {
            Some(habit) => {
                self.state = EditState::Renaming {
                    id: id.clone(),
                    buffer: habit.name.clone(),
                };
                true
            }
            None => false,
        }
    }

    /// Replaces the pending name.
    pub fn edit_buffer(&mut self, habits: &HabitData, text: &str) -> bool {
        if self.invalidate_missing(habits) {
            return false;
        }
        match &mut self.state {
            EditState::Renaming { buffer, .. } => {
                *buffer = text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Ends the rename session and hands back the target and its new name.
    /// Returns to edit mode either way; None when there was nothing to commit
    /// or the target has since been deleted.
    pub fn take_rename(&mut self, habits: &HabitData) -> Option<(HabitId, String)> {
        if self.invalidate_missing(habits) {
            return None;
        }
        match std::mem::replace(&mut self.state, EditState::Edit) {
            EditState::Renaming { id, buffer } => Some((id, buffer)),
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn cancel_rename(&mut self) -> bool {
        if matches!(self.state, EditState::Renaming { .. }) {
            self.state = EditState::Edit;
            true
        } else {
            false
        }
    }

    /// Drops back to edit mode when the habit being renamed is gone.
    pub fn invalidate_missing(&mut self, habits: &HabitData) -> bool {
        let dangling = match &self.state {
            EditState::Renaming { id, .. } => !habits.has(id),
            _ => false,
        };
        if dangling {
            self.state = EditState::Edit;
        }
        dangling
    }
}
