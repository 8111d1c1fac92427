use crate::data::{AppSettings, persistence::get_data_dir};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes the default config into the data directory and reports to `out`.
pub fn run<W: Write>(out: &mut W) -> Result<()> {
    run_in(&get_data_dir()?, out)
}

pub(crate) fn run_in<W: Write>(data_dir: &Path, out: &mut W) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create dir {}", data_dir.display()))?;

    let settings = AppSettings::default();
    settings.save_to(data_dir)?;
    tracing::info!(dir = %data_dir.display(), "wrote default config");

    write_summary(data_dir, &settings, out)
}

pub(crate) fn write_summary<W: Write>(
    dir: &Path,
    settings: &AppSettings,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Initialized data directory: {}", dir.display())?;
    writeln!(out, "✓ config.yaml created")?;
    writeln!(out, "Seed habits:")?;
    for name in &settings.seed_habits {
        writeln!(out, "  - {}", name)?;
    }
    writeln!(out, "Log level: {}", settings.log_level)?;
    Ok(())
}
