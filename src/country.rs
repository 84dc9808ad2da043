//! Country directory: supported region codes, calling codes and display names.
//!
//! The directory is a static, read-only table ordered by region code. Display
//! names are only known for a handful of languages; a missing name is a normal
//! outcome and callers are expected to tolerate it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PhoneEntryError;

/// Two-letter region identifier, only constructible for codes in the directory.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode(&'static str);

impl CountryCode {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        CountryCode("ZA")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.0)
    }
}

impl FromStr for CountryCode {
    type Err = PhoneEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PhoneEntryError::InvalidCountryCode(s.to_string()));
        }
        let upper = trimmed.to_ascii_uppercase();
        COUNTRIES
            .binary_search_by(|record| record.code.cmp(upper.as_str()))
            .map(|idx| CountryCode(COUNTRIES[idx].code))
            .map_err(|_| PhoneEntryError::UnknownCountry(upper))
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Calling code and (possibly absent) display name for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryMetadata {
    pub code: CountryCode,
    pub calling_code: u16,
    pub display_name: Option<&'static str>,
}

struct CountryRecord {
    code: &'static str,
    calling_code: u16,
    /// Display names keyed by lowercase language subtag.
    names: &'static [(&'static str, &'static str)],
}

// Sorted by `code`; `FromStr` relies on it for the binary search.
static COUNTRIES: &[CountryRecord] = &[
    CountryRecord { code: "AE", calling_code: 971, names: &[("en", "United Arab Emirates"), ("de", "Vereinigte Arabische Emirate"), ("fr", "Émirats arabes unis")] },
    CountryRecord { code: "AR", calling_code: 54, names: &[("en", "Argentina"), ("de", "Argentinien"), ("fr", "Argentine"), ("es", "Argentina")] },
    CountryRecord { code: "AT", calling_code: 43, names: &[("en", "Austria"), ("de", "Österreich"), ("fr", "Autriche")] },
    CountryRecord { code: "AU", calling_code: 61, names: &[("en", "Australia"), ("de", "Australien"), ("fr", "Australie")] },
    CountryRecord { code: "BE", calling_code: 32, names: &[("en", "Belgium"), ("de", "Belgien"), ("fr", "Belgique")] },
    CountryRecord { code: "BR", calling_code: 55, names: &[("en", "Brazil"), ("de", "Brasilien"), ("fr", "Brésil"), ("es", "Brasil")] },
    CountryRecord { code: "CA", calling_code: 1, names: &[("en", "Canada"), ("de", "Kanada"), ("fr", "Canada")] },
    CountryRecord { code: "CH", calling_code: 41, names: &[("en", "Switzerland"), ("de", "Schweiz"), ("fr", "Suisse")] },
    CountryRecord { code: "CN", calling_code: 86, names: &[("en", "China"), ("de", "China"), ("fr", "Chine")] },
    CountryRecord { code: "DE", calling_code: 49, names: &[("en", "Germany"), ("de", "Deutschland"), ("fr", "Allemagne"), ("es", "Alemania")] },
    CountryRecord { code: "DK", calling_code: 45, names: &[("en", "Denmark"), ("de", "Dänemark"), ("fr", "Danemark")] },
    CountryRecord { code: "EG", calling_code: 20, names: &[("en", "Egypt"), ("de", "Ägypten"), ("fr", "Égypte")] },
    CountryRecord { code: "ES", calling_code: 34, names: &[("en", "Spain"), ("de", "Spanien"), ("fr", "Espagne"), ("es", "España")] },
    CountryRecord { code: "FI", calling_code: 358, names: &[("en", "Finland"), ("de", "Finnland"), ("fr", "Finlande")] },
    CountryRecord { code: "FR", calling_code: 33, names: &[("en", "France"), ("de", "Frankreich"), ("fr", "France"), ("es", "Francia")] },
    CountryRecord { code: "GB", calling_code: 44, names: &[("en", "United Kingdom"), ("de", "Vereinigtes Königreich"), ("fr", "Royaume-Uni"), ("es", "Reino Unido")] },
    CountryRecord { code: "IE", calling_code: 353, names: &[("en", "Ireland"), ("de", "Irland"), ("fr", "Irlande")] },
    CountryRecord { code: "IN", calling_code: 91, names: &[("en", "India"), ("de", "Indien"), ("fr", "Inde")] },
    CountryRecord { code: "IT", calling_code: 39, names: &[("en", "Italy"), ("de", "Italien"), ("fr", "Italie"), ("es", "Italia")] },
    CountryRecord { code: "JP", calling_code: 81, names: &[("en", "Japan"), ("de", "Japan"), ("fr", "Japon")] },
    CountryRecord { code: "KE", calling_code: 254, names: &[("en", "Kenya"), ("de", "Kenia")] },
    CountryRecord { code: "KR", calling_code: 82, names: &[("en", "South Korea"), ("de", "Südkorea"), ("fr", "Corée du Sud")] },
    CountryRecord { code: "MX", calling_code: 52, names: &[("en", "Mexico"), ("de", "Mexiko"), ("fr", "Mexique"), ("es", "México")] },
    CountryRecord { code: "NG", calling_code: 234, names: &[("en", "Nigeria"), ("de", "Nigeria")] },
    CountryRecord { code: "NL", calling_code: 31, names: &[("en", "Netherlands"), ("de", "Niederlande"), ("fr", "Pays-Bas")] },
    CountryRecord { code: "NO", calling_code: 47, names: &[("en", "Norway"), ("de", "Norwegen"), ("fr", "Norvège")] },
    CountryRecord { code: "NZ", calling_code: 64, names: &[("en", "New Zealand"), ("de", "Neuseeland"), ("fr", "Nouvelle-Zélande")] },
    CountryRecord { code: "PL", calling_code: 48, names: &[("en", "Poland"), ("de", "Polen"), ("fr", "Pologne")] },
    CountryRecord { code: "PT", calling_code: 351, names: &[("en", "Portugal"), ("de", "Portugal"), ("fr", "Portugal"), ("es", "Portugal")] },
    CountryRecord { code: "RU", calling_code: 7, names: &[("en", "Russia"), ("de", "Russland"), ("fr", "Russie")] },
    CountryRecord { code: "SE", calling_code: 46, names: &[("en", "Sweden"), ("de", "Schweden"), ("fr", "Suède")] },
    CountryRecord { code: "SG", calling_code: 65, names: &[("en", "Singapore"), ("de", "Singapur")] },
    CountryRecord { code: "TR", calling_code: 90, names: &[("en", "Türkiye"), ("de", "Türkei"), ("fr", "Turquie")] },
    CountryRecord { code: "US", calling_code: 1, names: &[("en", "United States"), ("de", "Vereinigte Staaten"), ("fr", "États-Unis"), ("es", "Estados Unidos")] },
    CountryRecord { code: "ZA", calling_code: 27, names: &[("en", "South Africa"), ("de", "Südafrika"), ("fr", "Afrique du Sud")] },
];

/// Reduce a locale tag such as `de-CH` or `en_GB` to its lowercase language subtag.
fn language_of(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn record(code: CountryCode) -> &'static CountryRecord {
    // Every CountryCode was minted from a table entry, so the search always hits.
    let idx = COUNTRIES
        .binary_search_by(|record| record.code.cmp(code.0))
        .unwrap_or_default();
    &COUNTRIES[idx]
}

/// Read-only lookup over the static country table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountryDirectory;

impl CountryDirectory {
    /// All supported countries in their fixed order.
    pub fn list(&self) -> Vec<CountryCode> {
        COUNTRIES.iter().map(|record| CountryCode(record.code)).collect()
    }

    pub fn calling_code(&self, code: CountryCode) -> u16 {
        record(code).calling_code
    }

    /// Display name in the given locale, if the table carries one.
    pub fn display_name(&self, code: CountryCode, locale: &str) -> Option<&'static str> {
        let language = language_of(locale);
        record(code)
            .names
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, name)| *name)
    }

    pub fn metadata(&self, code: CountryCode, locale: &str) -> CountryMetadata {
        CountryMetadata {
            code,
            calling_code: self.calling_code(code),
            display_name: self.display_name(code, locale),
        }
    }

    /// Countries whose display name contains `query`, case-insensitively.
    ///
    /// Entries without a display name in `locale` never match, even for an
    /// empty query.
    pub fn filter(&self, query: &str, locale: &str) -> Vec<CountryCode> {
        let needle = query.to_lowercase();
        self.list()
            .into_iter()
            .filter(|code| {
                self.display_name(*code, locale)
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        s.parse().unwrap()
    }

    #[test]
    fn table_is_sorted_and_unique() {
        for pair in COUNTRIES.windows(2) {
            assert!(pair[0].code < pair[1].code, "{} before {}", pair[0].code, pair[1].code);
        }
    }

    #[test]
    fn default_code_is_in_table() {
        assert_eq!(code(CountryCode::default().as_str()), CountryCode::default());
    }

    #[test]
    fn parse_country_code() {
        assert_eq!(code("za").as_str(), "ZA");
        assert_eq!(code(" NO ").as_str(), "NO");
        assert!(matches!("ZZ".parse::<CountryCode>(), Err(PhoneEntryError::UnknownCountry(_))));
        assert!(matches!("ZAF".parse::<CountryCode>(), Err(PhoneEntryError::InvalidCountryCode(_))));
        assert!(matches!("4Z".parse::<CountryCode>(), Err(PhoneEntryError::InvalidCountryCode(_))));
    }

    #[test]
    fn metadata_resolves_calling_code_and_name() {
        let directory = CountryDirectory;
        let meta = directory.metadata(code("ZA"), "en");
        assert_eq!(meta.calling_code, 27);
        assert_eq!(meta.display_name, Some("South Africa"));
        assert_eq!(directory.display_name(code("ZA"), "de-DE"), Some("Südafrika"));
        assert_eq!(directory.display_name(code("KE"), "fr"), None);
        assert_eq!(directory.display_name(code("KE"), "xx"), None);
    }

    #[test]
    fn list_is_stable() {
        let directory = CountryDirectory;
        assert_eq!(directory.list(), directory.list());
        assert_eq!(directory.list().len(), COUNTRIES.len());
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let directory = CountryDirectory;
        let hits = directory.filter("SOUTH", "en");
        assert_eq!(hits, vec![code("KR"), code("ZA")]);
        assert_eq!(directory.filter("land", "en").len(), 6);
    }

    #[test]
    fn filter_skips_missing_names() {
        let directory = CountryDirectory;
        let all_fr = directory.filter("", "fr");
        assert!(!all_fr.contains(&code("KE")));
        assert!(all_fr.contains(&code("FR")));
        assert!(directory.filter("", "xx").is_empty());
    }

    #[test]
    fn serde_uses_plain_string() {
        let json = serde_json::to_string(&code("NO")).unwrap();
        assert_eq!(json, "\"NO\"");
        let back: CountryCode = serde_json::from_str("\"no\"").unwrap();
        assert_eq!(back, code("NO"));
        assert!(serde_json::from_str::<CountryCode>("\"QQ\"").is_err());
    }
}
