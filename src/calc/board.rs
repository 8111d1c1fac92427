use crate::calc::week::DayIndex;
use crate::data::{Habit, HabitData};
use crate::state::edit_mode::EditState;
use chrono::NaiveDate;
use serde::Serialize;

/// Smallest progress the indicator shows, so an empty bar stays visible.
pub const PROGRESS_FLOOR: f64 = 3.0;

/// Read-model handed to the presentation after every command.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Board {
    pub today: NaiveDate,
    pub day: DayIndex,
    pub habits: Vec<Habit>,
    pub remaining: usize,
    /// Raw completion share for today.
    pub progress: f64,
    /// `progress` with the display floor applied.
    pub display_progress: f64,
    pub edit: EditState,
}

impl Board {
    pub fn build(habits: &HabitData, edit: &EditState, today: NaiveDate) -> Self {
        let day = DayIndex::from_date(today);
        let progress = habits.progress_percent(day);
        Board {
            today,
            day,
            habits: habits.habits().to_vec(),
            remaining: habits.remaining_count(day),
            progress,
            display_progress: display_progress(progress),
            edit: edit.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    /// e.g. "today is monday, october 19"
    pub fn headline(&self) -> String {
        format!(
            "today is {}, {}",
            self.day.name(),
            self.today.format("%B %-d").to_string().to_lowercase()
        )
    }

    pub fn remaining_line(&self) -> String {
        format!("you have {} tasks remaining", self.remaining)
    }
}

pub fn display_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return PROGRESS_FLOOR;
    }
    progress.max(PROGRESS_FLOOR)
}
