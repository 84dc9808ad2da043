//! Caret controller for the phone field.
//!
//! Holds the authoritative caret in raw-buffer space together with the
//! derived formatted string and position map. Every operation is a pure state
//! transition that ends by producing one [`CaretSync`] command; applying that
//! command to the keyboard and the rendered field is the host's job.

use tracing::debug;

use crate::country::CountryCode;
use crate::digits::DigitBuffer;
use crate::fields::{ActiveField, CaretStrategy};
use crate::format::NumberFormatter;
use crate::mapper::PositionMap;

/// Command to place the external carets. Re-applying it is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretSync {
    /// Field whose caret is being placed.
    pub target: ActiveField,
    /// Caret in raw-buffer space, for collaborators that hold the raw text.
    pub raw: usize,
    /// Caret in displayed-text space, for the rendered field.
    pub formatted: usize,
}

/// Phone digits, their formatting, and the caret over both.
#[derive(Debug, Clone, Default)]
pub struct CaretController {
    buffer: DigitBuffer,
    raw: usize,
    formatted: String,
    map: PositionMap,
}

impl CaretController {
    /// Start with `buffer`, the caret parked after its last digit.
    pub fn new(buffer: DigitBuffer, country: CountryCode, formatter: &dyn NumberFormatter) -> Self {
        let raw = buffer.len();
        let mut controller = Self { buffer, raw, ..Self::default() };
        controller.refresh(country, formatter);
        controller
    }

    pub fn buffer(&self) -> &DigitBuffer {
        &self.buffer
    }

    pub fn raw_caret(&self) -> usize {
        self.raw
    }

    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    pub fn formatted_caret(&self) -> usize {
        self.map.to_formatted(self.raw)
    }

    pub fn map(&self) -> &PositionMap {
        &self.map
    }

    /// The keyboard reported new phone content.
    pub fn on_edit(
        &mut self,
        content: &str,
        strategy: CaretStrategy,
        country: CountryCode,
        formatter: &dyn NumberFormatter,
    ) -> CaretSync {
        self.raw = self.buffer.apply(self.raw, content, strategy);
        self.refresh(country, formatter);
        debug!(buffer = self.buffer.as_str(), raw = self.raw, formatted = %self.formatted, "phone buffer edited");
        self.sync()
    }

    /// A displayed character at formatted offset `offset` was clicked.
    pub fn on_click(&mut self, offset: usize) -> CaretSync {
        self.raw = self.map.to_raw(offset);
        debug!(offset, raw = self.raw, "caret placed by click");
        self.sync()
    }

    /// Digits are unchanged but grouping may differ; the raw caret stays put.
    pub fn on_country_change(&mut self, country: CountryCode, formatter: &dyn NumberFormatter) -> CaretSync {
        self.refresh(country, formatter);
        debug!(%country, raw = self.raw, formatted = %self.formatted, "reformatted for country");
        self.sync()
    }

    /// Move the caret to a raw offset reported by the keyboard, clamped to the buffer.
    pub fn place(&mut self, raw: usize) -> CaretSync {
        self.raw = raw.min(self.buffer.len());
        self.sync()
    }

    /// Move the caret after the last digit.
    pub fn place_at_end(&mut self) -> CaretSync {
        self.place(self.buffer.len())
    }

    fn refresh(&mut self, country: CountryCode, formatter: &dyn NumberFormatter) {
        self.formatted = formatter.format(self.buffer.as_str(), country);
        self.map = PositionMap::rebuild(&self.formatted);
        self.raw = self.raw.min(self.buffer.len());
    }

    fn sync(&self) -> CaretSync {
        CaretSync {
            target: ActiveField::PhoneDigits,
            raw: self.raw,
            formatted: self.formatted_caret(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::RuleFormatter;

    fn code(s: &str) -> CountryCode {
        s.parse().unwrap()
    }

    fn controller(digits: &str, country: &str) -> CaretController {
        CaretController::new(DigitBuffer::from_digits(digits), code(country), &RuleFormatter::new())
    }

    #[test]
    fn starts_at_end_of_buffer() {
        let c = controller("0712345", "ZA");
        assert_eq!(c.raw_caret(), 7);
        assert_eq!(c.formatted(), "071 234 5");
        assert_eq!(c.formatted_caret(), 9);
    }

    #[test]
    fn insert_pushes_formatted_caret_past_new_punctuation() {
        let f = RuleFormatter::new();
        let mut c = controller("071", "ZA");
        let sync = c.on_edit("0712", CaretStrategy::LengthDelta, code("ZA"), &f);
        assert_eq!(c.formatted(), "071 2");
        assert_eq!(sync, CaretSync { target: ActiveField::PhoneDigits, raw: 4, formatted: 5 });
    }

    #[test]
    fn click_then_insert_at_front() {
        let f = RuleFormatter::new();
        let za = code("ZA");
        let mut c = controller("0712345", "ZA");
        let sync = c.on_click(0);
        assert_eq!((sync.raw, sync.formatted), (0, 0));

        let sync = c.on_edit("90712345", CaretStrategy::LengthDelta, za, &f);
        assert_eq!(c.buffer().as_str(), "90712345");
        assert_eq!(sync.raw, 1);
    }

    #[test]
    fn click_on_punctuation_snaps_to_digit_boundary() {
        let mut c = controller("0712345", "ZA");
        // "071 234 5": offset 3 is the first space.
        let sync = c.on_click(3);
        assert_eq!(sync.raw, 3);
        assert_eq!(sync.formatted, 4);
        let sync = c.on_click(100);
        assert_eq!(sync.raw, 7);
    }

    #[test]
    fn country_switch_keeps_raw_caret() {
        let f = RuleFormatter::new();
        let mut c = controller("2125551234", "ZA");
        c.on_click(4);
        let before = c.raw_caret();
        let len = c.buffer().len();

        let sync = c.on_country_change(code("US"), &f);
        assert_eq!(c.formatted(), "(212) 555-1234");
        assert_eq!(c.raw_caret(), before);
        assert_eq!(c.buffer().len(), len);
        assert_eq!(sync.formatted, c.map().to_formatted(before));
    }

    #[test]
    fn repeated_sync_is_stable() {
        let mut c = controller("0712345", "ZA");
        let first = c.on_click(5);
        let second = c.place(first.raw);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_buffer_formats_empty() {
        let c = controller("", "NO");
        assert_eq!(c.formatted(), "");
        assert_eq!(c.formatted_caret(), 0);
    }
}
