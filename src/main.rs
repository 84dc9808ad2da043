//! # phone-entry
//!
//! Terminal front end for the `phone_entry` widget, plus small tools around
//! its formatter and country directory.
//!
//! ## Quick Start
//!
//! ```bash
//! # Enter a number interactively, starting in Norway
//! phone-entry ui --country NO
//!
//! # Format or strip numbers from scripts
//! phone-entry format 0712345 --country ZA
//! phone-entry strip +27714834857 --country ZA
//!
//! # Browse countries in German
//! phone-entry countries --filter reich --locale de
//! ```
//!
//! Logging is controlled by `RUST_LOG` (default `phone_entry=info`). The
//! interactive widget owns the terminal, so `ui` only logs when `--log-file`
//! or `PHONE_ENTRY_LOG` names a file.

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use phone_entry::config::WidgetConfig;

pub mod cli;
pub mod cmd;

use cli::Cli;
use cmd::*;

fn init_tracing(interactive: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("phone_entry=info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .compact()
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env::var_os("PHONE_ENTRY_LOG").map(PathBuf::from));
    init_tracing(matches!(cli.command, Commands::Ui { .. }), log_file.as_deref())?;

    let config = WidgetConfig::load(cli.config.as_deref()).context("loading widget config")?;

    match cli.command {
        Commands::Ui { country, locale, value, size, caret_strategy } =>
            cmd_ui(config, country, locale, value, size, caret_strategy),

        Commands::Format { digits, country } => cmd_format(&config, &digits, country),

        Commands::Strip { number, country } => cmd_strip(&config, &number, country),

        Commands::Countries { filter, locale, json } => cmd_countries(&config, filter, locale, json),

        Commands::Completions { shell } => cmd_completions(shell),
    }
    Ok(())
}
