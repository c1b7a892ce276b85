//! watchrun CLI - rerun a command every time a file is saved
//!
//! Usage: watchrun <COMMAND> [ARGS]...
//!
//! The command runs once at startup and again after every save in the
//! current directory. Type `r` to rerun by hand, `q` or Ctrl+C to quit.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

/// Variable holding a full `tracing` filter directive
const LOG_FILTER_ENV: &str = "WATCHRUN_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::watch::cmd_watch(cli.command)
}

/// Send diagnostics to stderr so they never mix with the command's output.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
