use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

/// Assign students and adults to workshops, one session at a time.
#[derive(Parser, Debug)]
#[command(name = "workshop-schedule", version, about)]
pub struct Cli {
    /// Directory holding students.csv, adults.csv and workshops.csv.
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// TOML configuration file (default: <data-dir>/schedule.toml, if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (overrides WORKSHOP_SCHEDULE_LOG).
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parses an environment value with the same names the flag accepts,
    /// ignoring case and surrounding whitespace.
    pub fn from_env_value(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).ok()
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
