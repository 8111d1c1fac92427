use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const DAYS_PER_WEEK: usize = 7;

/// Monday-first weekday names, as shown in the grid header.
pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Column of the weekly grid, 0 = Monday through 6 = Sunday.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DayIndex(usize);

impl DayIndex {
    pub const MONDAY: DayIndex = DayIndex(0);
    pub const SUNDAY: DayIndex = DayIndex(DAYS_PER_WEEK - 1);

    /// Returns None for anything outside 0..=6.
    pub fn new(index: usize) -> Option<Self> {
        (index < DAYS_PER_WEEK).then_some(DayIndex(index))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DayIndex(date.weekday().num_days_from_monday() as usize)
    }

    /// Looks up a lowercase weekday name such as "wednesday".
    pub fn from_name(name: &str) -> Option<Self> {
        DAY_NAMES.iter().position(|d| *d == name).map(DayIndex)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn name(self) -> &'static str {
        DAY_NAMES[self.0]
    }

    /// Next column, wrapping Sunday back to Monday.
    pub fn next(self) -> Self {
        if self == Self::SUNDAY {
            Self::MONDAY
        } else {
            DayIndex(self.0 + 1)
        }
    }

    /// Previous column, wrapping Monday back to Sunday.
    pub fn prev(self) -> Self {
        if self == Self::MONDAY {
            Self::SUNDAY
        } else {
            DayIndex(self.0 - 1)
        }
    }

    pub fn all() -> impl Iterator<Item = DayIndex> {
        (0..DAYS_PER_WEEK).map(DayIndex)
    }
}
