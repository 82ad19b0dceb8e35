//! Subscriber setup.
//!
//! The level comes from `--log-level`, else `WORKSHOP_SCHEDULE_LOG`, else
//! `info`. Events go to stderr so that stdout carries command output only.

use tracing::Level;

use crate::cli::LogLevel;

const LOG_ENV: &str = "WORKSHOP_SCHEDULE_LOG";

/// Installs the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) {
    let env_level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| LogLevel::from_env_value(&value));

    tracing_subscriber::fmt()
        .with_max_level(resolve_level(cli_level, env_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_level(cli_level: Option<LogLevel>, env_level: Option<LogLevel>) -> Level {
    cli_level.or(env_level).map_or(Level::INFO, Level::from)
}
