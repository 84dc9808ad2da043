//! Formatter adapter: raw digits + country -> national display string.
//!
//! [`NumberFormatter`] is the seam where a full numbering-plan library would
//! plug in. [`RuleFormatter`] is the built-in implementation, driven by a
//! small per-country grouping table. Both operations are pure functions of
//! their inputs, so the position map can be rebuilt deterministically.

use tracing::debug;

use crate::country::{CountryCode, CountryDirectory};

/// Formatting and dialling-code handling for national phone numbers.
pub trait NumberFormatter: Send + Sync {
    /// Format a (possibly incomplete) national number for display.
    ///
    /// The digit-only projection of the result must equal the digits of
    /// `digits`, in order.
    fn format(&self, digits: &str, country: CountryCode) -> String;

    /// Reduce a full or national number to its national-significant digits.
    ///
    /// Malformed input never fails: it degrades to every digit of the input.
    fn strip_dialling_code(&self, full_number: &str, country: CountryCode) -> String;
}

struct FormatRule {
    code: &'static str,
    trunk_prefix: Option<&'static str>,
    /// `#` marks a digit slot, every other character is punctuation.
    pattern: &'static str,
}

static RULES: &[FormatRule] = &[
    FormatRule { code: "AE", trunk_prefix: Some("0"), pattern: "## ### ####" },
    FormatRule { code: "AR", trunk_prefix: Some("0"), pattern: "## ####-####" },
    FormatRule { code: "AT", trunk_prefix: Some("0"), pattern: "### #######" },
    FormatRule { code: "AU", trunk_prefix: Some("0"), pattern: "### ### ###" },
    FormatRule { code: "BE", trunk_prefix: Some("0"), pattern: "### ## ## ##" },
    FormatRule { code: "BR", trunk_prefix: Some("0"), pattern: "(##) #####-####" },
    FormatRule { code: "CA", trunk_prefix: Some("1"), pattern: "(###) ###-####" },
    FormatRule { code: "CH", trunk_prefix: Some("0"), pattern: "## ### ## ##" },
    FormatRule { code: "CN", trunk_prefix: Some("0"), pattern: "### #### ####" },
    FormatRule { code: "DE", trunk_prefix: Some("0"), pattern: "### ########" },
    FormatRule { code: "DK", trunk_prefix: None, pattern: "## ## ## ##" },
    FormatRule { code: "EG", trunk_prefix: Some("0"), pattern: "### ### ####" },
    FormatRule { code: "ES", trunk_prefix: None, pattern: "### ## ## ##" },
    FormatRule { code: "FI", trunk_prefix: Some("0"), pattern: "## ### ####" },
    FormatRule { code: "FR", trunk_prefix: Some("0"), pattern: "# ## ## ## ##" },
    FormatRule { code: "GB", trunk_prefix: Some("0"), pattern: "#### ######" },
    FormatRule { code: "IE", trunk_prefix: Some("0"), pattern: "## ### ####" },
    FormatRule { code: "IN", trunk_prefix: Some("0"), pattern: "#####-#####" },
    FormatRule { code: "IT", trunk_prefix: None, pattern: "### ### ####" },
    FormatRule { code: "JP", trunk_prefix: Some("0"), pattern: "##-####-####" },
    FormatRule { code: "KE", trunk_prefix: Some("0"), pattern: "### ######" },
    FormatRule { code: "KR", trunk_prefix: Some("0"), pattern: "##-####-####" },
    FormatRule { code: "MX", trunk_prefix: None, pattern: "### ### ####" },
    FormatRule { code: "NG", trunk_prefix: Some("0"), pattern: "### ### ####" },
    FormatRule { code: "NL", trunk_prefix: Some("0"), pattern: "# ########" },
    FormatRule { code: "NO", trunk_prefix: None, pattern: "### ## ###" },
    FormatRule { code: "NZ", trunk_prefix: Some("0"), pattern: "## ### ####" },
    FormatRule { code: "PL", trunk_prefix: None, pattern: "### ### ###" },
    FormatRule { code: "PT", trunk_prefix: None, pattern: "### ### ###" },
    FormatRule { code: "RU", trunk_prefix: Some("8"), pattern: "(###) ###-##-##" },
    FormatRule { code: "SE", trunk_prefix: Some("0"), pattern: "##-### ## ##" },
    FormatRule { code: "SG", trunk_prefix: None, pattern: "#### ####" },
    FormatRule { code: "TR", trunk_prefix: Some("0"), pattern: "(###) ### ## ##" },
    FormatRule { code: "US", trunk_prefix: Some("1"), pattern: "(###) ###-####" },
    FormatRule { code: "ZA", trunk_prefix: Some("0"), pattern: "## ### ####" },
];

const FALLBACK_RULE: FormatRule = FormatRule { code: "", trunk_prefix: None, pattern: "" };

fn rule_for(country: CountryCode) -> &'static FormatRule {
    RULES
        .iter()
        .find(|rule| rule.code == country.as_str())
        .unwrap_or(&FALLBACK_RULE)
}

impl FormatRule {
    fn slots(&self) -> usize {
        self.pattern.chars().filter(|c| *c == '#').count()
    }

    /// Split a trunk prefix off the front of a national number, if present.
    fn split_trunk<'a>(&self, digits: &'a str) -> (&'a str, &'a str) {
        match self.trunk_prefix {
            Some(prefix) if digits.starts_with(prefix) => digits.split_at(prefix.len()),
            _ => ("", digits),
        }
    }
}

/// Fill `pattern` slot by slot; punctuation is emitted only ahead of a filled slot.
fn fill_pattern(pattern: &str, digits: &str, out: &mut String) {
    let mut remaining = digits.chars().peekable();
    let mut pending = String::new();
    for ch in pattern.chars() {
        if remaining.peek().is_none() {
            break;
        }
        if ch == '#' {
            out.push_str(&pending);
            pending.clear();
            if let Some(digit) = remaining.next() {
                out.push(digit);
            }
        } else {
            pending.push(ch);
        }
    }
}

fn only_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Table-driven formatter covering every country in the [`CountryDirectory`].
///
/// The table holds one pattern per country for the 35 regions the directory
/// knows about. Regions outside it and numbering plans with several number
/// lengths need a full metadata-backed [`NumberFormatter`], which hosts can
/// pass to [`PhoneNumberInput::new`](crate::widget::PhoneNumberInput::new).
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleFormatter {
    directory: CountryDirectory,
}

impl RuleFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip an international prefix and calling code, returning what follows.
    fn strip_international<'a>(&self, digits: &'a str, international: bool, country: CountryCode) -> Option<&'a str> {
        if !international {
            return Some(digits);
        }
        let calling_code = self.directory.calling_code(country).to_string();
        digits.strip_prefix(calling_code.as_str())
    }

    fn parse_national(&self, full_number: &str, country: CountryCode) -> Option<String> {
        let trimmed = full_number.trim();
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')' | '/');
        let (international, body) = if let Some(rest) = trimmed.strip_prefix('+') {
            (true, rest)
        } else if let Some(rest) = trimmed.strip_prefix("00") {
            (true, rest)
        } else {
            (false, trimmed)
        };
        if !body.chars().all(allowed) {
            return None;
        }

        let digits = only_digits(body);
        let rule = rule_for(country);
        let national = self.strip_international(&digits, international, country)?;
        let (_, significant) = rule.split_trunk(national);
        if significant.is_empty() {
            return None;
        }
        // Past a matched calling code the rest is national even when it overflows the pattern.
        if !international && significant.len() > rule.slots() {
            return None;
        }
        Some(significant.to_string())
    }
}

impl NumberFormatter for RuleFormatter {
    fn format(&self, digits: &str, country: CountryCode) -> String {
        let rule = rule_for(country);
        let (trunk, national) = rule.split_trunk(digits);
        if national.chars().count() > rule.slots() || national.chars().any(|c| !c.is_ascii_digit()) {
            return digits.to_string();
        }

        let mut out = String::with_capacity(rule.pattern.len() + trunk.len() + 1);
        out.push_str(trunk);
        if !trunk.is_empty() && !national.is_empty() && !rule.pattern.starts_with('#') {
            out.push(' ');
        }
        fill_pattern(rule.pattern, national, &mut out);
        out
    }

    fn strip_dialling_code(&self, full_number: &str, country: CountryCode) -> String {
        match self.parse_national(full_number, country) {
            Some(national) => national,
            None => {
                if !full_number.trim().is_empty() {
                    debug!(input = full_number, %country, "unparsable number, keeping its digits");
                }
                only_digits(full_number)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CountryCode {
        s.parse().unwrap()
    }

    #[test]
    fn every_directory_country_has_a_rule() {
        for country in CountryDirectory.list() {
            assert_eq!(rule_for(country).code, country.as_str());
        }
    }

    #[test]
    fn formats_incomplete_numbers_without_trailing_punctuation() {
        let f = RuleFormatter::new();
        let za = code("ZA");
        assert_eq!(f.format("", za), "");
        assert_eq!(f.format("7", za), "7");
        assert_eq!(f.format("71", za), "71");
        assert_eq!(f.format("714", za), "71 4");
        assert_eq!(f.format("714834857", za), "71 483 4857");
        assert_eq!(f.format("0714834857", za), "071 483 4857");
        assert_eq!(f.format("0712345", za), "071 234 5");
    }

    #[test]
    fn formats_leading_punctuation_and_trunk_separator() {
        let f = RuleFormatter::new();
        let us = code("US");
        assert_eq!(f.format("2", us), "(2");
        assert_eq!(f.format("2125551234", us), "(212) 555-1234");
        assert_eq!(f.format("12125551234", us), "1 (212) 555-1234");
    }

    #[test]
    fn overflow_returns_digits_verbatim() {
        let f = RuleFormatter::new();
        assert_eq!(f.format("123456789012", code("NO")), "123456789012");
        assert_eq!(f.format("12345678", code("NO")), "123 45 678");
    }

    #[test]
    fn formatting_preserves_digits() {
        let f = RuleFormatter::new();
        let corpus = ["", "0", "1", "00", "0712345", "714834857", "12345678901234", "9876543210", "8"];
        for country in CountryDirectory.list() {
            for digits in corpus {
                let formatted = f.format(digits, country);
                assert_eq!(only_digits(&formatted), digits, "{country} {digits:?} -> {formatted:?}");
            }
        }
    }

    #[test]
    fn strips_calling_code() {
        let f = RuleFormatter::new();
        let za = code("ZA");
        assert_eq!(f.strip_dialling_code("+27714834857", za), "714834857");
        assert_eq!(f.strip_dialling_code("0027 71 483 4857", za), "714834857");
        assert_eq!(f.strip_dialling_code("071 483 4857", za), "714834857");
        assert_eq!(f.strip_dialling_code("+1 (212) 555-1234", code("US")), "2125551234");
    }

    #[test]
    fn overlong_international_numbers_keep_national_digits() {
        let f = RuleFormatter::new();
        let za = code("ZA");
        assert_eq!(f.strip_dialling_code("+277148348571", za), "7148348571");
        assert_eq!(f.strip_dialling_code("+2707148348571", za), "7148348571");
        assert_eq!(f.strip_dialling_code("001 234 567 890 123", code("US")), "234567890123");
        // Without a calling code an overlong number is not trusted.
        assert_eq!(f.strip_dialling_code("07148348571234", za), "07148348571234");
    }

    #[test]
    fn malformed_numbers_fall_back_to_digits() {
        let f = RuleFormatter::new();
        let za = code("ZA");
        assert_eq!(f.strip_dialling_code("", za), "");
        assert_eq!(f.strip_dialling_code("+44 20 7946 0000", za), "442079460000");
        assert_eq!(f.strip_dialling_code("call 071-483", za), "071483");
        assert_eq!(f.strip_dialling_code("+27", za), "27");
    }
}
