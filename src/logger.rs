//! Colored stderr logger for the REPL
//!
//! Level comes from `COMPING_LOG` (`error`, `warn`, `info`, `debug`, `trace`
//! or `off`); anything else means `warn`.

use anyhow::{anyhow, Result};
use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

pub const LOG_ENV: &str = "COMPING_LOG";

struct ReplLogger {
    level: LevelFilter,
}

impl Log for ReplLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "error".bright_red().bold(),
            Level::Warn => "warn".yellow().bold(),
            Level::Info => "info".bright_cyan(),
            Level::Debug => "debug".dimmed(),
            Level::Trace => "trace".dimmed(),
        };
        eprintln!("{} {} {}", tag, record.target().dimmed(), record.args());
    }

    fn flush(&self) {}
}

/// Level for a `COMPING_LOG` value
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Install the logger. Fails if another logger is already installed.
pub fn init() -> Result<()> {
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());
    log::set_boxed_logger(Box::new(ReplLogger { level }))
        .map_err(|e| anyhow!("Failed to install logger: {}", e))?;
    log::set_max_level(level);
    Ok(())
}
