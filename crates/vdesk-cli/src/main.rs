//! # vdesk — desk container manager CLI
//!
//! Creates per-user development containers from a compose template and
//! manages their lifecycle, from the command line or an interactive
//! dashboard.

mod commands;
mod output;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vdesk_common::constants::TUI_LOG_FILE;

use crate::commands::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    commands::execute(cli)
}

/// Logs go to stderr, or to a file while the dashboard owns the terminal.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    if matches!(cli.command, Command::Tui(_)) {
        let log_dir = cli.config().log_dir;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("cannot create {}", log_dir.display()))?;
        let path = log_dir.join(TUI_LOG_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}
