//! Widget construction configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! `PHONE_ENTRY_*` environment variables. The CLI applies its own flags last.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::country::CountryCode;
use crate::error::PhoneEntryError;
use crate::fields::{CaretStrategy, SizeVariant};

pub const DEFAULT_LOCALE: &str = "en";

/// How a phone entry widget instance starts out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WidgetConfig {
    /// Full number, optionally with a `+<calling code>` prefix.
    pub initial_value: Option<String>,
    pub initial_country: CountryCode,
    pub locale: Option<String>,
    pub size: SizeVariant,
    pub caret_strategy: CaretStrategy,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            initial_value: None,
            initial_country: CountryCode::default(),
            locale: None,
            size: SizeVariant::default(),
            caret_strategy: CaretStrategy::default(),
        }
    }
}

impl WidgetConfig {
    /// Locale used for display names, defaulting to English.
    pub fn locale_or_default(&self) -> &str {
        self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, PhoneEntryError> {
        let raw = fs::read_to_string(path).map_err(|source| PhoneEntryError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| PhoneEntryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded widget config");
        Ok(config)
    }

    /// Defaults, overlaid with `path` (if given) and then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, PhoneEntryError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| env::var(name).ok());
        Ok(config)
    }

    /// Apply `PHONE_ENTRY_*` overrides looked up through `lookup`.
    ///
    /// Unrecognised values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("PHONE_ENTRY_COUNTRY") {
            match value.parse() {
                Ok(code) => self.initial_country = code,
                Err(e) => warn!("ignoring PHONE_ENTRY_COUNTRY: {e}"),
            }
        }
        if let Some(value) = lookup("PHONE_ENTRY_LOCALE").filter(|v| !v.trim().is_empty()) {
            self.locale = Some(value.trim().to_string());
        }
        if let Some(value) = lookup("PHONE_ENTRY_VALUE") {
            self.initial_value = Some(value);
        }
        if let Some(value) = lookup("PHONE_ENTRY_SIZE") {
            match serde_json::from_value(serde_json::Value::String(value.trim().to_ascii_lowercase())) {
                Ok(size) => self.size = size,
                Err(_) => warn!("ignoring PHONE_ENTRY_SIZE={value}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.initial_country.as_str(), "ZA");
        assert_eq!(config.locale_or_default(), "en");
        assert_eq!(config.size, SizeVariant::Medium);
        assert_eq!(config.caret_strategy, CaretStrategy::LengthDelta);
        assert!(config.initial_value.is_none());
    }

    #[test]
    fn loads_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"initial-country": "NO", "size": "small", "caret-strategy": "diff"}}"#).unwrap();
        let config = WidgetConfig::from_file(file.path()).unwrap();
        assert_eq!(config.initial_country.as_str(), "NO");
        assert_eq!(config.size, SizeVariant::Small);
        assert_eq!(config.caret_strategy, CaretStrategy::Diff);
        assert_eq!(config.locale, None);
    }

    #[test]
    fn bad_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(WidgetConfig::from_file(&missing), Err(PhoneEntryError::ConfigRead { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"initial-country": "QQ"}"#).unwrap();
        assert!(matches!(WidgetConfig::from_file(&bad), Err(PhoneEntryError::ConfigParse { .. })));
    }

    #[test]
    fn environment_overrides() {
        let mut config = WidgetConfig::default();
        config.apply_overrides(env_of(&[
            ("PHONE_ENTRY_COUNTRY", "us"),
            ("PHONE_ENTRY_LOCALE", "de-CH"),
            ("PHONE_ENTRY_VALUE", "+12125551234"),
            ("PHONE_ENTRY_SIZE", "Large"),
        ]));
        assert_eq!(config.initial_country.as_str(), "US");
        assert_eq!(config.locale_or_default(), "de-CH");
        assert_eq!(config.initial_value.as_deref(), Some("+12125551234"));
        assert_eq!(config.size, SizeVariant::Large);
    }

    #[test]
    fn invalid_environment_values_are_ignored() {
        let mut config = WidgetConfig::default();
        config.apply_overrides(env_of(&[("PHONE_ENTRY_COUNTRY", "XX"), ("PHONE_ENTRY_SIZE", "huge")]));
        assert_eq!(config, WidgetConfig::default());
    }
}
