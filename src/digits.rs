//! Canonical digit buffer and the edit operation that replaces it.
//!
//! The keyboard owns its own editing semantics and always reports the *whole*
//! new buffer. This module accepts that content as the new canonical buffer
//! and infers where the caret went.

use crate::fields::CaretStrategy;

/// Caret position after `old` was replaced by `new`, both measured in chars.
///
/// With [`CaretStrategy::LengthDelta`] the caret moves by the length change,
/// assuming the edit happened at the caret. [`CaretStrategy::Diff`] first
/// checks that assumption against the actual content and otherwise places the
/// caret after the changed region. The result is always within `0..=len(new)`.
pub fn next_caret(old: &str, new: &str, caret: usize, strategy: CaretStrategy) -> usize {
    let old_len = old.chars().count();
    let new_len = new.chars().count();
    let caret = caret.min(old_len);

    let moved = match strategy {
        CaretStrategy::LengthDelta => {
            if new_len >= old_len {
                caret + (new_len - old_len)
            } else {
                caret.saturating_sub(old_len - new_len)
            }
        }
        CaretStrategy::Diff => diff_caret(old, new, caret),
    };
    moved.min(new_len)
}

fn diff_caret(old: &str, new: &str, caret: usize) -> usize {
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();

    if new.len() >= old.len() {
        let k = new.len() - old.len();
        if new[..caret] == old[..caret] && new[caret + k..] == old[caret..] {
            return caret + k;
        }
    } else {
        let k = old.len() - new.len();
        if caret >= k && new[..caret - k] == old[..caret - k] && new[caret - k..] == old[caret..] {
            return caret - k;
        }
    }

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    new.len() - suffix
}

/// Ordered raw digits for the phone field. Only ASCII digits are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: String,
}

impl DigitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from arbitrary text, keeping its digits.
    pub fn from_digits(value: &str) -> Self {
        Self { digits: sanitize(value) }
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Replace the buffer with keyboard content and return the new raw caret.
    ///
    /// Non-digit characters (e.g. from a mistargeted key) are dropped before
    /// the content becomes canonical.
    pub fn apply(&mut self, raw_caret: usize, content: &str, strategy: CaretStrategy) -> usize {
        let incoming = sanitize(content);
        let caret = next_caret(&self.digits, &incoming, raw_caret, strategy);
        self.digits = incoming;
        caret
    }
}

fn sanitize(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGIES: [CaretStrategy; 2] = [CaretStrategy::LengthDelta, CaretStrategy::Diff];

    fn insert_at(s: &str, at: usize, digit: char) -> String {
        let mut out = s.to_string();
        out.insert(at, digit);
        out
    }

    fn remove_before(s: &str, at: usize) -> String {
        let mut out = s.to_string();
        out.remove(at - 1);
        out
    }

    #[test]
    fn single_insert_advances_caret() {
        let start = "0712345";
        for strategy in STRATEGIES {
            for r in 0..=start.len() {
                let mut buffer = DigitBuffer::from_digits(start);
                let expected = insert_at(start, r, '9');
                let caret = buffer.apply(r, &expected, strategy);
                assert_eq!(caret, r + 1, "{strategy:?} at {r}");
                assert_eq!(buffer.len(), start.len() + 1);
                assert_eq!(buffer.as_str().as_bytes()[r], b'9');
            }
        }
    }

    #[test]
    fn backspace_retreats_caret() {
        let start = "5551234";
        for strategy in STRATEGIES {
            for r in 1..=start.len() {
                let mut buffer = DigitBuffer::from_digits(start);
                let caret = buffer.apply(r, &remove_before(start, r), strategy);
                assert_eq!(caret, r - 1, "{strategy:?} at {r}");
                assert_eq!(buffer.len(), start.len() - 1);
            }
        }
    }

    #[test]
    fn caret_is_clamped_to_new_buffer() {
        let mut buffer = DigitBuffer::from_digits("12345");
        assert_eq!(buffer.apply(99, "1", CaretStrategy::LengthDelta), 1);
        assert_eq!(buffer.apply(0, "", CaretStrategy::LengthDelta), 0);
    }

    #[test]
    fn length_delta_misplaces_distant_paste() {
        // Paste of "99" at the front while the caret sits at the end.
        let mut buffer = DigitBuffer::from_digits("1234");
        assert_eq!(buffer.apply(4, "991234", CaretStrategy::LengthDelta), 6);

        let mut buffer = DigitBuffer::from_digits("1234");
        assert_eq!(buffer.apply(4, "991234", CaretStrategy::Diff), 2);
    }

    #[test]
    fn diff_handles_replacement() {
        assert_eq!(next_caret("12345", "1985", 1, CaretStrategy::Diff), 3);
        assert_eq!(next_caret("", "42", 0, CaretStrategy::Diff), 2);
    }

    #[test]
    fn non_digits_are_dropped() {
        let mut buffer = DigitBuffer::new();
        let caret = buffer.apply(0, "07a1", CaretStrategy::LengthDelta);
        assert_eq!(buffer.as_str(), "071");
        assert_eq!(caret, 3);
        assert_eq!(DigitBuffer::from_digits("+27 71").as_str(), "2771");
    }

    #[test]
    fn caret_counts_chars_not_bytes() {
        assert_eq!(next_caret("Süd", "Südaf", 3, CaretStrategy::LengthDelta), 5);
        assert_eq!(next_caret("Süd", "Sd", 2, CaretStrategy::Diff), 1);
    }
}
