use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Phone number entry with live national formatting.
/// Settings come from defaults, then --config, then PHONE_ENTRY_* variables, then flags.
#[derive(Parser)]
#[command(name = "phone-entry", version, about = "Phone number entry widget and formatting tools")]
pub struct Cli {
    /// Path to a JSON widget config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append logs to this file (defaults to $PHONE_ENTRY_LOG).
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
