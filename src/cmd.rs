//! Command implementations for the CLI interface.
//!
//! Each subcommand resolves its inputs against the layered [`WidgetConfig`]
//! and either runs the terminal widget or calls the formatter and country
//! directory directly.

use clap::Subcommand;
use clap_complete::{generate, Shell};
use serde::Serialize;

use phone_entry::config::WidgetConfig;
use phone_entry::country::{CountryCode, CountryDirectory};
use phone_entry::fields::{CaretStrategy, SizeVariant};
use phone_entry::format::{NumberFormatter, RuleFormatter};
use phone_entry::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive phone entry widget.
    Ui {
        /// Initial country (ISO 3166-1 alpha-2).
        #[arg(long)]
        country: Option<CountryCode>,
        /// Locale for country names, e.g. "de" or "fr-CA".
        #[arg(long)]
        locale: Option<String>,
        /// Initial number, optionally with a +<calling code> prefix.
        #[arg(long)]
        value: Option<String>,
        /// Display width: small | medium | large.
        #[arg(long, value_enum)]
        size: Option<SizeVariant>,
        /// Caret re-derivation after edits: length-delta | diff.
        #[arg(long, value_enum)]
        caret_strategy: Option<CaretStrategy>,
    },

    /// Format national digits for a country.
    Format {
        /// National digits to format.
        digits: String,
        /// Country to format for (defaults to the configured country).
        #[arg(long)]
        country: Option<CountryCode>,
    },

    /// Strip the dialling code from a number, leaving national digits.
    Strip {
        /// Full or national number, e.g. "+27714834857".
        number: String,
        /// Country whose calling code is expected.
        #[arg(long)]
        country: Option<CountryCode>,
    },

    /// List supported countries.
    Countries {
        /// Case-insensitive substring of the localised name.
        #[arg(long)]
        filter: Option<String>,
        /// Locale for country names.
        #[arg(long)]
        locale: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Serialize)]
struct CountryRow {
    code: CountryCode,
    calling_code: u16,
    name: &'static str,
}

/// Run the interactive widget and print the confirmed number.
pub fn cmd_ui(
    mut config: WidgetConfig,
    country: Option<CountryCode>,
    locale: Option<String>,
    value: Option<String>,
    size: Option<SizeVariant>,
    caret_strategy: Option<CaretStrategy>,
) {
    if let Some(country) = country {
        config.initial_country = country;
    }
    if locale.is_some() {
        config.locale = locale;
    }
    if value.is_some() {
        config.initial_value = value;
    }
    if let Some(size) = size {
        config.size = size;
    }
    if let Some(strategy) = caret_strategy {
        config.caret_strategy = strategy;
    }

    match run_tui(&config) {
        Ok(Some(number)) => println!("{number}"),
        Ok(None) => {}
        Err(e) => {
            eprintln!("UI error: {e}");
            std::process::exit(1);
        }
    }
}

/// Print `digits` formatted for the country.
pub fn cmd_format(config: &WidgetConfig, digits: &str, country: Option<CountryCode>) {
    let country = country.unwrap_or(config.initial_country);
    println!("{}", RuleFormatter::new().format(digits, country));
}

/// Print the national-significant digits of `number`.
pub fn cmd_strip(config: &WidgetConfig, number: &str, country: Option<CountryCode>) {
    let country = country.unwrap_or(config.initial_country);
    println!("{}", RuleFormatter::new().strip_dialling_code(number, country));
}

/// List countries, optionally filtered by localised name.
pub fn cmd_countries(config: &WidgetConfig, filter: Option<String>, locale: Option<String>, json: bool) {
    let locale = locale.unwrap_or_else(|| config.locale_or_default().to_string());
    let directory = CountryDirectory;
    let codes = directory.filter(filter.as_deref().unwrap_or(""), &locale);

    let rows: Vec<CountryRow> = codes
        .into_iter()
        .filter_map(|code| {
            let meta = directory.metadata(code, &locale);
            meta.display_name.map(|name| CountryRow {
                code,
                calling_code: meta.calling_code,
                name,
            })
        })
        .collect();

    if json {
        match serde_json::to_string_pretty(&rows) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Failed to serialise countries: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if rows.is_empty() {
        println!("No countries match.");
        return;
    }
    for row in rows {
        println!("{:<4} {:<6} {}", row.code.as_str(), format!("+{}", row.calling_code), row.name);
    }
}

/// Generate shell completions.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
