pub mod app_settings;
pub mod habit;
pub mod persistence;

pub use app_settings::AppSettings;
pub use habit::{Habit, HabitData, HabitId};
