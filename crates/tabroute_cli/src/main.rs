//! `tabroute` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start optional file logging and load engine settings.
//! - Replay routing operations against a snapshot and print JSON results.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tabroute_core::{default_log_level, init_logging, RouterSettings};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.settings {
        Some(path) => RouterSettings::load(path)
            .with_context(|| format!("cannot load settings `{}`", path.display()))?,
        None => RouterSettings::default(),
    };

    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .as_deref()
            .or(settings.log_level.as_deref())
            .unwrap_or_else(|| default_log_level());
        let log_dir = log_dir.to_str().context("log directory is not valid UTF-8")?;
        init_logging(level, log_dir)?;
    }

    let options = settings.routing_options();
    match &cli.command {
        Command::Sort(args) => commands::run_sort(args, options),
        Command::Rebind(args) => commands::run_rebind(args, options),
        Command::Preview(args) => commands::run_preview(args, options),
        Command::Route(args) => commands::run_route(args, options),
    }
}
