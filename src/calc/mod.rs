pub mod board;
pub mod week;

pub use board::Board;
pub use week::{DAY_NAMES, DayIndex};
