mod calc;
mod cmd;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HABITS_LOG";
const LOG_FILE: &str = "habits.log";

#[derive(Parser)]
#[command(name = "habits", about = "weekly habit grid")]
struct Cli {
    /// Path to the data directory holding config.yaml and the log (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.yaml
    Init,
    /// Print the starting grid for a day without opening the terminal UI
    Show {
        /// Date to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Weekday of the current week to show, e.g. "wednesday"
        #[arg(long, conflicts_with = "date")]
        day: Option<String>,
        /// Emit the board as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Missing config.yaml loads as defaults.
    let settings = data::AppSettings::load_from(&data_dir)?;
    init_logging(&data_dir, &settings.log_level)?;

    if !matches!(cli.command, Some(Commands::Init)) {
        ensure_config(&data_dir, &mut std::io::stderr())?;
    }

    match cli.command {
        None => cmd::root::run(&settings),
        Some(Commands::Init) => cmd::init::run(&mut std::io::stdout()),
        Some(Commands::Show { date, day, json }) => {
            cmd::show::run(&settings, date.as_deref(), day.as_deref(), json)
        }
    }
}

/// Returns true when `dir` has no config.yaml yet.
fn dir_needs_init(dir: &Path) -> bool {
    !data::AppSettings::exists_in(dir)
}

/// Runs init when config.yaml is missing. Notes go to `notes` (stderr in
/// main) so stdout carries only the command's own output.
fn ensure_config<W: Write>(data_dir: &Path, notes: &mut W) -> Result<bool> {
    if !dir_needs_init(data_dir) {
        return Ok(false);
    }
    writeln!(notes, "No config in '{}', running init...", data_dir.display())?;
    cmd::init::run_in(data_dir, notes)?;
    Ok(true)
}

/// Sends tracing output to `<data_dir>/habits.log`; stdout belongs to the UI.
fn init_logging(data_dir: &Path, default_level: &str) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create dir {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(LOG_ENV).ok().as_deref(), default_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

/// HABITS_LOG wins when it parses; otherwise the configured level, then "info".
fn log_filter(env_value: Option<&str>, default_level: &str) -> EnvFilter {
    env_value
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_new(default_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
