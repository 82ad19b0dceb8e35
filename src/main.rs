mod cli;
mod logging;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use workshop_schedule::config::{self, ScheduleConfig};
use workshop_schedule::session::{Command, Session};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);

    let config = match &cli.config {
        Some(path) => ScheduleConfig::load_from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => {
            let path = config::default_config_path(&cli.data_dir);
            if path.exists() {
                ScheduleConfig::load_from_path(&path)
                    .with_context(|| format!("reading config {}", path.display()))?
            } else {
                ScheduleConfig::default()
            }
        }
    };

    let mut session = Session::load(&cli.data_dir, &config)
        .with_context(|| format!("loading data from {}", cli.data_dir.display()))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("reading command")?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                error!("{err}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        match session.execute(&command) {
            Ok(output) => writeln!(stdout, "{output}")?,
            Err(err) => error!("{err}"),
        }
    }

    Ok(())
}
