use crate::calc::{Board, DAY_NAMES, DayIndex};
use crate::data::{AppSettings, HabitData};
use crate::state::{Clock, FixedClock, SystemClock, Tracker};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

pub fn run(
    settings: &AppSettings,
    date: Option<&str>,
    day: Option<&str>,
    json: bool,
) -> Result<()> {
    let habits = HabitData::seeded(&settings.seed_habits);
    let board = match (date, day) {
        (Some(raw), _) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))?;
            board_for(habits, FixedClock(date))
        }
        (None, Some(name)) => {
            let date = day_in_week(SystemClock.today(), name)?;
            board_for(habits, FixedClock(date))
        }
        (None, None) => board_for(habits, SystemClock),
    };

    let mut out = std::io::stdout();
    if json {
        write_board_json(&board, &mut out)
    } else {
        write_board(&board, &mut out)
    }
}

/// The date of weekday `name` in the Monday-first week containing `today`.
fn day_in_week(today: NaiveDate, name: &str) -> Result<NaiveDate> {
    let target = DayIndex::from_name(&name.trim().to_lowercase()).with_context(|| {
        format!("unknown day '{}', expected one of: {}", name, DAY_NAMES.join(", "))
    })?;
    let offset = target.index() as i64 - DayIndex::from_date(today).index() as i64;
    Ok(today + Duration::days(offset))
}

fn board_for<C: Clock>(habits: HabitData, clock: C) -> Board {
    Tracker::new(habits, clock).board()
}

pub(crate) fn write_board<W: std::io::Write>(board: &Board, out: &mut W) -> Result<()> {
    writeln!(out, "{}", board.headline())?;
    writeln!(out, "{}", board.remaining_line())?;
    writeln!(out, "progress: {:.0}%", board.display_progress)?;
    writeln!(out, "---")?;

    let header: Vec<String> = DAY_NAMES
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let short = &d[..3];
            if i == board.day.index() {
                short.to_uppercase()
            } else {
                short.to_string()
            }
        })
        .collect();
    writeln!(out, "  {:<20} {}", "", header.join(" "))?;

    for habit in &board.habits {
        let cells: Vec<&str> = DayIndex::all()
            .map(|d| if habit.is_done(d) { "[x]" } else { "[ ]" })
            .collect();
        writeln!(out, "  {:<20} {}", habit.name, cells.join(" "))?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} habit(s)", board.habits.len())?;
    Ok(())
}

pub(crate) fn write_board_json<W: std::io::Write>(board: &Board, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, board).context("failed to serialize board")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HabitId;

    // 2025-01-10 is Friday
    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    fn render(board: &Board) -> String {
        let mut buf = Vec::new();
        write_board(board, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_board_default_seed() {
        let seeded = HabitData::seeded(&AppSettings::default().seed_habits);
        let board = board_for(seeded, FixedClock(friday()));
        let out = render(&board);
        assert!(out.contains("today is friday, january 10"));
        assert!(out.contains("you have 5 tasks remaining"));
        assert!(out.contains("progress: 3%"));
        assert!(out.contains("mon tue wed thu FRI sat sun"));
        assert!(out.contains("Total: 5 habit(s)"));
    }

    #[test]
    fn test_write_board_marks_done_cells() {
        let mut tracker = Tracker::new(HabitData::seeded(&["gym"]), FixedClock(friday()));
        tracker.toggle_completion(&HabitId::from("1"), 4);
        let out = render(&tracker.board());
        assert!(out.contains("[ ] [ ] [ ] [ ] [x] [ ] [ ]"));
        assert!(out.contains("progress: 100%"));
        assert!(out.contains("you have 0 tasks remaining"));
    }

    #[test]
    fn test_write_board_empty() {
        let board = board_for(HabitData::default(), FixedClock(friday()));
        let out = render(&board);
        assert!(out.contains("progress: 3%"));
        assert!(out.contains("Total: 0 habit(s)"));
    }

    #[test]
    fn test_write_board_json_parses_back() {
        let board = board_for(HabitData::seeded(&["gym", "draw"]), FixedClock(friday()));
        let mut buf = Vec::new();
        write_board_json(&board, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["day"], 4);
        assert_eq!(value["remaining"], 2);
        assert_eq!(value["display_progress"], 3.0);
        assert_eq!(value["habits"][1]["name"], "draw");
        assert_eq!(value["edit"]["state"], "view");
    }

    #[test]
    fn test_day_in_week_moves_within_current_week() {
        assert_eq!(
            day_in_week(friday(), "monday").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
        assert_eq!(
            day_in_week(friday(), "Sunday").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()
        );
        assert_eq!(day_in_week(friday(), "friday").unwrap(), friday());
    }

    #[test]
    fn test_day_in_week_rejects_unknown_name() {
        let err = day_in_week(friday(), "funday").unwrap_err();
        assert!(err.to_string().contains("unknown day 'funday'"));
    }

    #[test]
    fn test_board_for_named_day_highlights_that_column() {
        let date = day_in_week(friday(), "wednesday").unwrap();
        let out = render(&board_for(HabitData::seeded(&["gym"]), FixedClock(date)));
        assert!(out.contains("today is wednesday, january 8"));
        assert!(out.contains("mon tue WED thu fri sat sun"));
    }
}
