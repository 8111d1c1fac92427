use crate::calc::{Board, DayIndex};
use crate::data::{HabitData, HabitId};
use crate::state::clock::{Clock, SystemClock};
use crate::state::edit_mode::EditController;
use tracing::debug;

/// Owns the habit list and the edit state for one widget. Every command
/// runs to completion and hands back a fresh [`Board`]; rejected commands
/// leave state untouched.
pub struct Tracker<C: Clock = SystemClock> {
    habits: HabitData,
    edit: EditController,
    clock: C,
}

impl<C: Clock> Tracker<C> {
    pub fn new(habits: HabitData, clock: C) -> Self {
        Tracker {
            habits,
            edit: EditController::default(),
            clock,
        }
    }

    pub fn board(&self) -> Board {
        Board::build(&self.habits, self.edit.state(), self.clock.today())
    }

    pub fn habits(&self) -> &HabitData {
        &self.habits
    }

    pub fn add(&mut self, name: &str) -> Board {
        if self.gate_structural("add") {
            match self.habits.add(name) {
                Some(id) => debug!(%id, "habit added"),
                None => debug!("add ignored: blank name"),
            }
        }
        self.board()
    }

    pub fn rename(&mut self, id: &HabitId, new_name: &str) -> Board {
        if self.gate_structural("rename") && !self.habits.rename(id, new_name) {
            debug!(%id, "rename ignored: unknown habit");
        }
        self.board()
    }

    pub fn delete(&mut self, id: &HabitId) -> Board {
        if self.gate_structural("delete") {
            if self.habits.delete(id) {
                debug!(%id, "habit deleted");
                if self.edit.invalidate_missing(&self.habits) {
                    debug!(%id, "rename session dropped with its habit");
                }
            } else {
                debug!(%id, "delete ignored: unknown habit");
            }
        }
        self.board()
    }

    pub fn toggle_completion(&mut self, id: &HabitId, day: usize) -> Board {
        if !self.edit.state().can_toggle() {
            debug!(%id, day, "toggle rejected in edit mode");
            return self.board();
        }
        match DayIndex::new(day) {
            Some(day) => {
                if !self.habits.toggle_completion(id, day) {
                    debug!(%id, "toggle ignored: unknown habit");
                }
            }
            None => debug!(%id, day, "toggle ignored: day out of range"),
        }
        self.board()
    }

    pub fn reset(&mut self) -> Board {
        self.habits.reset();
        debug!(habits = self.habits.len(), "week reset");
        self.board()
    }

    pub fn toggle_edit_mode(&mut self) -> Board {
        self.edit.toggle_edit_mode();
        debug!(editing = self.edit.state().is_editing(), "edit mode toggled");
        self.board()
    }

    pub fn start_rename(&mut self, id: &HabitId) -> Board {
        if !self.edit.start_rename(&self.habits, id) {
            debug!(%id, "start_rename ignored");
        }
        self.board()
    }

    pub fn edit_buffer(&mut self, text: &str) -> Board {
        self.edit.edit_buffer(&self.habits, text);
        self.board()
    }

    pub fn commit_rename(&mut self) -> Board {
        match self.edit.take_rename(&self.habits) {
            Some((id, name)) => {
                debug!(%id, "rename committed");
                self.rename(&id, &name)
            }
            None => self.board(),
        }
    }

    pub fn cancel_rename(&mut self) -> Board {
        if self.edit.cancel_rename() {
            debug!("rename cancelled");
        }
        self.board()
    }

    fn gate_structural(&self, command: &str) -> bool {
        let allowed = self.edit.state().is_editing();
        if !allowed {
            debug!(command, "rejected outside edit mode");
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::clock::FixedClock;
    use crate::state::edit_mode::EditState;
    use chrono::NaiveDate;

    // 2025-01-06 is Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn tracker(names: &[&str]) -> Tracker<FixedClock> {
        Tracker::new(HabitData::seeded(names), FixedClock(monday()))
    }

    fn id(s: &str) -> HabitId {
        HabitId::from(s)
    }

    #[test]
    fn test_single_habit_scenario() {
        let mut t = tracker(&["sleep before 2"]);
        let board = t.toggle_completion(&id("1"), 0);
        assert!(board.habits[0].completed[0]);
        assert_eq!(board.remaining, 0);
        assert_eq!(board.progress, 100.0);
        assert_eq!(board.display_progress, 100.0);
    }

    #[test]
    fn test_two_habits_one_done() {
        let mut t = tracker(&["a", "b"]);
        let board = t.toggle_completion(&id("2"), 0);
        assert_eq!(board.remaining, 1);
        assert_eq!(board.progress, 50.0);
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut t = tracker(&["a"]);
        for day in 0..7 {
            t.toggle_completion(&id("1"), day);
            let board = t.toggle_completion(&id("1"), day);
            assert_eq!(board.habits[0].completed, [false; 7]);
        }
    }

    #[test]
    fn test_toggle_gated_in_edit_mode() {
        let mut t = tracker(&["a", "b"]);
        t.toggle_edit_mode();
        for h in ["1", "2"] {
            for day in 0..7 {
                t.toggle_completion(&id(h), day);
            }
        }
        assert!(t.habits().habits().iter().all(|h| h.completed == [false; 7]));
    }

    #[test]
    fn test_toggle_gated_while_renaming() {
        let mut t = tracker(&["a"]);
        t.toggle_edit_mode();
        t.start_rename(&id("1"));
        let board = t.toggle_completion(&id("1"), 0);
        assert!(!board.habits[0].completed[0]);
    }

    #[test]
    fn test_toggle_out_of_range_day_is_noop() {
        let mut t = tracker(&["a"]);
        let board = t.toggle_completion(&id("1"), 7);
        assert_eq!(board.habits[0].completed, [false; 7]);
    }

    #[test]
    fn test_reset_then_progress_is_floored() {
        let mut t = tracker(&["a", "b"]);
        t.toggle_completion(&id("1"), 0);
        let board = t.reset();
        assert_eq!(board.display_progress, 3.0);

        let mut empty = tracker(&[]);
        assert_eq!(empty.reset().display_progress, 3.0);
    }

    #[test]
    fn test_reset_allowed_in_edit_mode() {
        let mut t = tracker(&["a"]);
        t.toggle_completion(&id("1"), 0);
        t.toggle_edit_mode();
        let board = t.reset();
        assert!(!board.habits[0].completed[0]);
    }

    #[test]
    fn test_whitespace_add_leaves_collection_unchanged() {
        let mut t = tracker(&["a"]);
        t.toggle_edit_mode();
        let board = t.add("  ");
        assert_eq!(board.habits.len(), 1);
    }

    #[test]
    fn test_add_requires_edit_mode() {
        let mut t = tracker(&["a"]);
        assert_eq!(t.add("read").habits.len(), 1);
        t.toggle_edit_mode();
        let board = t.add("read");
        assert_eq!(board.habits.len(), 2);
        assert_eq!(board.habits[1].name, "read");
    }

    #[test]
    fn test_delete_requires_edit_mode() {
        let mut t = tracker(&["a", "b"]);
        assert_eq!(t.delete(&id("1")).habits.len(), 2);
        t.toggle_edit_mode();
        assert_eq!(t.delete(&id("1")).habits.len(), 1);
    }

    #[test]
    fn test_direct_rename_requires_edit_mode() {
        let mut t = tracker(&["a"]);
        assert_eq!(t.rename(&id("1"), "b").habits[0].name, "a");
        t.toggle_edit_mode();
        assert_eq!(t.rename(&id("1"), " b ").habits[0].name, " b ");
    }

    #[test]
    fn test_rename_cancelled_by_leaving_edit_mode() {
        let mut t = tracker(&["journal"]);
        t.toggle_edit_mode();
        t.start_rename(&id("1"));
        t.edit_buffer("diary");
        let board = t.toggle_edit_mode();
        assert_eq!(board.habits[0].name, "journal");
        assert_eq!(board.edit, EditState::View);
    }

    #[test]
    fn test_rename_commit_flow() {
        let mut t = tracker(&["journal"]);
        t.toggle_edit_mode();
        let board = t.start_rename(&id("1"));
        assert_eq!(board.edit.renaming(), Some((&id("1"), "journal")));
        t.edit_buffer("diary");
        let board = t.commit_rename();
        assert_eq!(board.habits[0].name, "diary");
        assert_eq!(board.edit, EditState::Edit);
    }

    #[test]
    fn test_commit_rename_keeps_whitespace() {
        let mut t = tracker(&["journal"]);
        t.toggle_edit_mode();
        t.start_rename(&id("1"));
        t.edit_buffer("  diary ");
        let board = t.commit_rename();
        assert_eq!(board.habits[0].name, "  diary ");
        assert_eq!(board.edit, EditState::Edit);
    }

    #[test]
    fn test_commit_without_session_changes_nothing() {
        let mut t = tracker(&["journal"]);
        t.toggle_edit_mode();
        let board = t.commit_rename();
        assert_eq!(board.habits[0].name, "journal");
        assert_eq!(board.edit, EditState::Edit);
    }

    #[test]
    fn test_cancel_rename_idempotent() {
        let mut t = tracker(&["journal"]);
        t.toggle_edit_mode();
        t.start_rename(&id("1"));
        let once = t.cancel_rename();
        let twice = t.cancel_rename();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_deleting_renamed_habit_invalidates_session() {
        let mut t = tracker(&["a", "b"]);
        t.toggle_edit_mode();
        t.start_rename(&id("2"));
        let board = t.delete(&id("2"));
        assert_eq!(board.edit, EditState::Edit);
        assert_eq!(board.habits.len(), 1);
    }

    #[test]
    fn test_deleting_other_habit_keeps_session() {
        let mut t = tracker(&["a", "b"]);
        t.toggle_edit_mode();
        t.start_rename(&id("2"));
        let board = t.delete(&id("1"));
        assert_eq!(board.edit.renaming().map(|(i, _)| i.clone()), Some(id("2")));
    }

    #[test]
    fn test_start_rename_unknown_id_stays_in_edit() {
        let mut t = tracker(&["a"]);
        t.toggle_edit_mode();
        assert_eq!(t.start_rename(&id("99")).edit, EditState::Edit);
    }

    #[test]
    fn test_board_reads_clock() {
        // 2025-01-12 is Sunday
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let mut t = Tracker::new(HabitData::seeded(&["a"]), FixedClock(sunday));
        t.toggle_completion(&id("1"), 6);
        let board = t.board();
        assert_eq!(board.day, DayIndex::SUNDAY);
        assert_eq!(board.remaining, 0);
    }
}
