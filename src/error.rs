//! Error types for the fallible outer surfaces: parsing country codes and loading config.
//!
//! The widget core itself has no error states: every lookup there returns an
//! `Option` or a fallback value.
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for configuration and host plumbing.
#[derive(Error, Debug)]
pub enum PhoneEntryError {
    #[error("Invalid country code '{0}': expected two ASCII letters")]
    InvalidCountryCode(String),

    #[error("Unknown country code '{0}'")]
    UnknownCountry(String),

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
