//! Bidirectional index translation between raw-buffer and formatted offsets.
//!
//! The map is rebuilt from scratch whenever the formatted string changes. It
//! is linear in the length of the formatted string and holds no history, so
//! there is nothing to keep in sync between edits.

use tracing::trace;

/// Offsets are counted in chars on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMap {
    /// `raw_to_formatted[r]` for `r` in `0..=raw_len`.
    raw_to_formatted: Vec<usize>,
    /// `formatted_to_raw[f]` for `f` in `0..=formatted_len`.
    formatted_to_raw: Vec<usize>,
}

impl Default for PositionMap {
    fn default() -> Self {
        Self::rebuild("")
    }
}

impl PositionMap {
    /// Walk `formatted` once, pairing every digit with its raw offset.
    pub fn rebuild(formatted: &str) -> Self {
        let mut raw_to_formatted = vec![0];
        let mut formatted_to_raw = Vec::with_capacity(formatted.len() + 1);
        let mut raw = 0;

        for (offset, ch) in formatted.chars().enumerate() {
            formatted_to_raw.push(raw);
            if ch.is_ascii_digit() {
                // Offset 0 always maps to 0, even behind leading punctuation.
                if raw > 0 {
                    raw_to_formatted.push(offset);
                }
                raw += 1;
            }
        }
        formatted_to_raw.push(raw);
        let formatted_len = formatted_to_raw.len() - 1;
        if raw > 0 {
            raw_to_formatted.push(formatted_len);
        }

        trace!(formatted, raw_len = raw, "rebuilt position map");
        Self { raw_to_formatted, formatted_to_raw }
    }

    /// Number of digits in the formatted string.
    pub fn raw_len(&self) -> usize {
        self.raw_to_formatted.len() - 1
    }

    /// Length of the formatted string in chars.
    pub fn formatted_len(&self) -> usize {
        self.formatted_to_raw.len().saturating_sub(1)
    }

    /// Formatted offset just before the `raw`-th digit, or the end of the
    /// string for the final offset. Out-of-range input is clamped.
    pub fn to_formatted(&self, raw: usize) -> usize {
        let raw = raw.min(self.raw_len());
        self.raw_to_formatted[raw]
    }

    /// Raw offset of the first digit at or after `formatted`, or the buffer
    /// length when no digit follows. Clicks on punctuation therefore land on
    /// the digit boundary to their right.
    pub fn to_raw(&self, formatted: usize) -> usize {
        match self.formatted_to_raw.get(formatted) {
            Some(raw) => *raw,
            None => self.raw_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::CountryDirectory;
    use crate::format::{NumberFormatter, RuleFormatter};

    const CORPUS: [&str; 8] = ["", "0", "71", "0712345", "714834857", "12125551234", "8912345678", "123456789012345"];

    #[test]
    fn empty_string_maps_to_zero() {
        let map = PositionMap::rebuild("");
        assert_eq!(map.raw_len(), 0);
        assert_eq!(map.formatted_len(), 0);
        assert_eq!(map.to_formatted(0), 0);
        assert_eq!(map.to_raw(0), 0);
        assert_eq!(map.to_raw(5), 0);
    }

    #[test]
    fn maps_digits_around_punctuation() {
        // "071 234 5"
        let map = PositionMap::rebuild("071 234 5");
        assert_eq!(map.raw_len(), 7);
        assert_eq!(map.to_formatted(0), 0);
        assert_eq!(map.to_formatted(2), 2);
        assert_eq!(map.to_formatted(3), 4);
        assert_eq!(map.to_formatted(6), 8);
        assert_eq!(map.to_formatted(7), 9);
        assert_eq!(map.to_formatted(42), 9);
    }

    #[test]
    fn punctuation_clicks_land_on_the_right_boundary() {
        let map = PositionMap::rebuild("071 234 5");
        assert_eq!(map.to_raw(3), 3);
        assert_eq!(map.to_raw(7), 6);
        assert_eq!(map.to_raw(9), 7);

        let map = PositionMap::rebuild("(212) 555-1");
        assert_eq!(map.to_raw(0), 0);
        assert_eq!(map.to_raw(4), 3);
        assert_eq!(map.to_raw(5), 3);
        assert_eq!(map.to_raw(9), 6);
    }

    #[test]
    fn leading_punctuation_keeps_origin() {
        let map = PositionMap::rebuild("(2");
        assert_eq!(map.to_formatted(0), 0);
        assert_eq!(map.to_formatted(1), 2);
        assert_eq!(map.to_raw(map.to_formatted(1)), 1);
    }

    #[test]
    fn round_trip_is_identity_for_every_country() {
        let formatter = RuleFormatter::new();
        for country in CountryDirectory.list() {
            for digits in CORPUS {
                let formatted = formatter.format(digits, country);
                let map = PositionMap::rebuild(&formatted);
                assert_eq!(map.raw_len(), digits.len());
                let mut last = 0;
                for r in 0..=digits.len() {
                    let f = map.to_formatted(r);
                    assert!(f >= last, "non-monotonic for {country} {formatted:?}");
                    assert!(f <= map.formatted_len());
                    assert_eq!(map.to_raw(f), r, "{country} {formatted:?} at {r}");
                    last = f;
                }
            }
        }
    }

    #[test]
    fn inverse_is_monotonic_and_bounded() {
        let formatter = RuleFormatter::new();
        for country in CountryDirectory.list() {
            let formatted = formatter.format("0712345", country);
            let map = PositionMap::rebuild(&formatted);
            let mut last = 0;
            for f in 0..=map.formatted_len() + 2 {
                let r = map.to_raw(f);
                assert!(r >= last && r <= map.raw_len());
                last = r;
            }
        }
    }
}
