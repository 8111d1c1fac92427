pub mod clock;
pub mod edit_mode;
pub mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use edit_mode::EditState;
pub use tracker::Tracker;
