use crate::calc::week::{DAYS_PER_WEEK, DayIndex};
use chrono::Utc;
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HabitId {
    fn from(s: &str) -> Self {
        HabitId(s.to_string())
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    /// One flag per weekday, Monday first.
    pub completed: [bool; DAYS_PER_WEEK],
}

impl Habit {
    pub fn new(id: HabitId, name: &str) -> Self {
        Habit {
            id,
            name: name.to_string(),
            completed: [false; DAYS_PER_WEEK],
        }
    }

    pub fn is_done(&self, day: DayIndex) -> bool {
        self.completed[day.index()]
    }
}

/// The habit collection for the widget's lifetime, in insertion order.
#[derive(Default, Debug, Clone)]
pub struct HabitData {
    habits: Vec<Habit>,
    /// Highest time-derived id handed out so far.
    last_issued: i64,
}

impl HabitData {
    /// Builds the starting collection with ids "1", "2", ... for each non-blank name.
    pub fn seeded<S: AsRef<str>>(names: &[S]) -> Self {
        let habits = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .enumerate()
            .map(|(i, name)| Habit::new(HabitId((i + 1).to_string()), name))
            .collect();
        HabitData {
            habits,
            last_issued: 0,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| &h.id == id)
    }

    pub fn has(&self, id: &HabitId) -> bool {
        self.get(id).is_some()
    }

    /// Appends a habit under the trimmed name. Blank names are ignored.
    pub fn add(&mut self, name: &str) -> Option<HabitId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.issue_id();
        self.habits.push(Habit::new(id.clone(), name));
        Some(id)
    }

    /// Replaces the name exactly as given; unlike `add`, no trimming happens here.
    pub fn rename(&mut self, id: &HabitId, new_name: &str) -> bool {
        match self.habits.iter_mut().find(|h| &h.id == id) {
            Some(habit) => {
                habit.name = new_name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &HabitId) -> bool {
        let before = self.habits.len();
        self.habits.retain(|h| &h.id != id);
        self.habits.len() != before
    }

    pub fn toggle_completion(&mut self, id: &HabitId, day: DayIndex) -> bool {
        match self.habits.iter_mut().find(|h| &h.id == id) {
            Some(habit) => {
                let flag = &mut habit.completed[day.index()];
                *flag = !*flag;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        for habit in &mut self.habits {
            habit.completed = [false; DAYS_PER_WEEK];
        }
    }

    pub fn completed_count(&self, day: DayIndex) -> usize {
        self.habits.iter().filter(|h| h.is_done(day)).count()
    }

    pub fn remaining_count(&self, day: DayIndex) -> usize {
        self.habits.len() - self.completed_count(day)
    }

    /// Share of habits done on `day`, 0.0..=100.0. An empty collection yields 0.
    pub fn progress_percent(&self, day: DayIndex) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        100.0 * self.completed_count(day) as f64 / self.habits.len() as f64
    }

    fn issue_id(&mut self) -> HabitId {
        let mut candidate = Utc::now().timestamp_millis().max(self.last_issued + 1);
        while self.habits.iter().any(|h| h.id.as_str() == candidate.to_string()) {
            candidate += 1;
        }
        self.last_issued = candidate;
        HabitId(candidate.to_string())
    }
}
