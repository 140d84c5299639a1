//! Log setup.
//!
//! The terminal is busy drawing the quiz, so logs go to a file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSection;

/// Overrides `[logging] filter` when set.
pub const ENV_LOG: &str = "TUI_TIMES_LOG";

/// Install a global subscriber writing to `config.file`.
pub fn init(config: &LoggingSection) -> Result<()> {
    let filter = match std::env::var(ENV_LOG) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(&config.filter),
    }
    .context("invalid log filter")?;

    let file = open_log(&config.file)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")?;
    Ok(())
}

fn open_log(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
