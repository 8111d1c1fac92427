use crate::data::{AppSettings, HabitData, persistence::get_data_dir};
use crate::state::{SystemClock, Tracker};
use crate::ui::habit_view::{App, run_app};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use tracing::info;

pub fn run(settings: &AppSettings) -> Result<()> {
    let tracker = Tracker::new(HabitData::seeded(&settings.seed_habits), SystemClock);
    info!(habits = tracker.habits().len(), "opening habit grid");

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let data_dir = get_data_dir().unwrap_or_else(|_| std::path::PathBuf::from("./config"));
    let mut app = App::new(tracker, data_dir);

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    info!("habit grid closed");

    result
}
