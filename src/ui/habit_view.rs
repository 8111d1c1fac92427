use crate::calc::{Board, DAY_NAMES, DayIndex};
use crate::data::HabitId;
use crate::state::{Clock, EditState, SystemClock, Tracker};
use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
};
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

const DONE_COLOR: Color = Color::Rgb(34, 197, 94);
const NAME_WIDTH: u16 = 24;
const DAY_WIDTH: u16 = 10;

pub struct App<C: Clock = SystemClock> {
    tracker: Tracker<C>,
    /// Latest read-model; replaced after every command.
    board: Board,
    selected_habit: usize,
    selected_day: DayIndex,
    /// Open "new habit" input while in edit mode.
    new_habit_input: Option<String>,
    data_dir: PathBuf,
}

impl<C: Clock> App<C> {
    pub fn new(tracker: Tracker<C>, data_dir: PathBuf) -> Self {
        let board = tracker.board();
        let selected_day = board.day;
        App {
            tracker,
            board,
            selected_habit: 0,
            selected_day,
            new_habit_input: None,
            data_dir,
        }
    }

    fn apply(&mut self, board: Board) {
        self.board = board;
        if self.selected_habit >= self.board.habits.len() {
            self.selected_habit = self.board.habits.len().saturating_sub(1);
        }
    }

    fn selected_id(&self) -> Option<HabitId> {
        self.board
            .habits
            .get(self.selected_habit)
            .map(|h| h.id.clone())
    }

    fn move_habit_cursor(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected_habit = self.selected_habit.saturating_sub(1),
            KeyCode::Down => {
                if self.selected_habit + 1 < self.board.habits.len() {
                    self.selected_habit += 1;
                }
            }
            _ => {}
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if let Some((_, buffer)) = self.board.edit.renaming() {
            let mut buffer = buffer.to_string();
            let board = match code {
                KeyCode::Enter => self.tracker.commit_rename(),
                KeyCode::Esc => self.tracker.cancel_rename(),
                KeyCode::Backspace => {
                    buffer.pop();
                    self.tracker.edit_buffer(&buffer)
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.tracker.edit_buffer(&buffer)
                }
                _ => return false,
            };
            self.apply(board);
            return false;
        }

        if let Some(input) = self.new_habit_input.as_mut() {
            match code {
                KeyCode::Enter => {
                    let name = std::mem::take(input);
                    let board = self.tracker.add(&name);
                    if board.habits.len() > self.board.habits.len() {
                        self.selected_habit = board.habits.len() - 1;
                    }
                    self.apply(board);
                }
                KeyCode::Esc => self.new_habit_input = None,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return false;
        }

        if self.board.is_editing() {
            match code {
                KeyCode::Up | KeyCode::Down => self.move_habit_cursor(code),
                KeyCode::Char('a') => self.new_habit_input = Some(String::new()),
                KeyCode::Char('r') | KeyCode::Enter => {
                    if let Some(id) = self.selected_id() {
                        let board = self.tracker.start_rename(&id);
                        self.apply(board);
                    }
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(id) = self.selected_id() {
                        let board = self.tracker.delete(&id);
                        self.apply(board);
                    }
                }
                KeyCode::Char('R') => {
                    let board = self.tracker.reset();
                    self.apply(board);
                }
                KeyCode::Char('e') | KeyCode::Esc => {
                    self.new_habit_input = None;
                    let board = self.tracker.toggle_edit_mode();
                    self.apply(board);
                }
                KeyCode::Char('q') => return true,
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Left => self.selected_day = self.selected_day.prev(),
            KeyCode::Right => self.selected_day = self.selected_day.next(),
            KeyCode::Up | KeyCode::Down => self.move_habit_cursor(code),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    let board = self
                        .tracker
                        .toggle_completion(&id, self.selected_day.index());
                    self.apply(board);
                }
            }
            KeyCode::Char('t') => {
                let board = self.tracker.board();
                self.selected_day = board.day;
                self.apply(board);
            }
            KeyCode::Char('R') => {
                let board = self.tracker.reset();
                self.apply(board);
            }
            KeyCode::Char('e') => {
                let board = self.tracker.toggle_edit_mode();
                self.apply(board);
            }
            KeyCode::Char('q') => return true,
            _ => {}
        }
        false
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // headline, remaining count, gauge
                Constraint::Min(3),    // habit grid
                Constraint::Length(1), // new habit input
                Constraint::Length(6), // key bindings
                Constraint::Length(1), // data dir footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_grid(f, chunks[1]);
        self.render_new_habit(f, chunks[2]);
        self.render_help(f, chunks[3]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Data  ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                self.data_dir.to_string_lossy().to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        f.render_widget(footer, chunks[4]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let mode = if self.board.is_editing() {
            Span::styled(
                "  [edit]",
                Style::default().fg(DONE_COLOR).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("")
        };
        let text = vec![
            Line::from(vec![
                Span::styled(self.board.headline(), Style::default().add_modifier(Modifier::BOLD)),
                mode,
            ]),
            Line::from(Span::styled(
                self.board.remaining_line(),
                Style::default().fg(Color::Gray),
            )),
        ];
        f.render_widget(Paragraph::new(text), rows[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(DONE_COLOR).bg(Color::Rgb(40, 44, 52)))
            .ratio(gauge_ratio(self.board.display_progress))
            .label(format!("{:.0}%", self.board.progress));
        f.render_widget(gauge, rows[1]);
    }

    fn render_grid(&self, f: &mut Frame, area: Rect) {
        let editing = self.board.is_editing();
        let renaming = self.board.edit.renaming();

        let mut header_cells = vec![Cell::from("")];
        for day in DayIndex::all() {
            let style = if day == self.board.day {
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::Gray)
            };
            header_cells.push(Cell::from(DAY_NAMES[day.index()]).style(style));
        }

        let rows: Vec<Row> = self
            .board
            .habits
            .iter()
            .enumerate()
            .map(|(row, habit)| {
                let row_selected = row == self.selected_habit;
                let name_cell = match renaming {
                    Some((id, buffer)) if *id == habit.id => Cell::from(format!("{buffer}_"))
                        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    _ => {
                        let prefix = if editing && row_selected { "> " } else { "  " };
                        let style = if row_selected {
                            Style::default().add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        Cell::from(format!("{prefix}{}", habit.name)).style(style)
                    }
                };
                let mut cells = vec![name_cell];
                for day in DayIndex::all() {
                    let done = habit.is_done(day);
                    let cursor = !editing && row_selected && day == self.selected_day;
                    cells.push(
                        Cell::from(if done { "[x]" } else { "[ ]" })
                            .style(day_cell_style(done, cursor, day == self.board.day, editing)),
                    );
                }
                Row::new(cells)
            })
            .collect();

        let mut widths = vec![Constraint::Length(NAME_WIDTH)];
        widths.extend(std::iter::repeat_n(Constraint::Length(DAY_WIDTH), DAY_NAMES.len()));

        let table = Table::new(rows, widths)
            .header(Row::new(header_cells))
            .block(Block::default().borders(Borders::TOP))
            .column_spacing(1);
        f.render_widget(table, area);
    }

    fn render_new_habit(&self, f: &mut Frame, area: Rect) {
        let line = match (&self.new_habit_input, self.board.is_editing()) {
            (Some(input), _) => Line::from(vec![
                Span::styled("  + ", Style::default().fg(DONE_COLOR)),
                Span::raw(format!("{input}_")),
            ]),
            (None, true) => Line::from(Span::styled(
                "  + press a to add a habit",
                Style::default().add_modifier(Modifier::DIM),
            )),
            (None, false) => Line::from(""),
        };
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let key_rows: Vec<Row> = match (&self.board.edit, &self.new_habit_input) {
            (EditState::Renaming { .. }, _) => vec![
                Row::new(vec!["type", "Edit name", "Backspace", "Delete char"]),
                Row::new(vec!["Enter", "Save name", "Esc", "Cancel"]),
            ],
            (EditState::Edit, Some(_)) => vec![
                Row::new(vec!["type", "Habit name", "Enter", "Add habit"]),
                Row::new(vec!["Esc", "Close input", "", ""]),
            ],
            (EditState::Edit, None) => vec![
                Row::new(vec!["↑ ↓", "Select habit", "a", "New habit"]),
                Row::new(vec!["r/Enter", "Rename", "d/Del", "Delete"]),
                Row::new(vec!["R", "Reset week", "e/Esc", "Done editing"]),
                Row::new(vec!["q/Ctrl+C", "Quit", "", ""]),
            ],
            (EditState::View, _) => vec![
                Row::new(vec!["← → ↑ ↓", "Move", "Space", "Toggle day"]),
                Row::new(vec!["t", "Jump to today", "R", "Reset week"]),
                Row::new(vec!["e", "Edit habits", "q/Ctrl+C", "Quit"]),
            ],
        };

        let help_table = Table::new(
            key_rows,
            [
                Constraint::Length(12),
                Constraint::Length(18),
                Constraint::Length(12),
                Constraint::Length(18),
            ],
        )
        .block(Block::default().borders(Borders::TOP))
        .column_spacing(1);
        f.render_widget(help_table, area);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app<C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<C>,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}

// ── Grid helpers ──────────────────────────────────────────────────────────────

/// Gauge ratio for a 0..=100 percentage.
pub(crate) fn gauge_ratio(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}

/// Style for one checkbox cell of the grid.
pub(crate) fn day_cell_style(done: bool, is_cursor: bool, is_today: bool, editing: bool) -> Style {
    if is_cursor {
        let bg = if done { DONE_COLOR } else { Color::White };
        return Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD);
    }
    let mut s = if done {
        Style::default().fg(DONE_COLOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    if editing {
        s = s.add_modifier(Modifier::DIM);
    } else if is_today {
        s = s.add_modifier(Modifier::UNDERLINED);
    }
    s
}
