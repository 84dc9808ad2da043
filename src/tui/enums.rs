//! Enumerations for TUI state management.

use crate::country::CountryCode;

/// What a mouse click landed on, resolved against the last rendered layout.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClickTarget {
    /// A character of the formatted number, by formatted offset.
    Character(usize),
    /// The phone display, but not on a character.
    PhoneBox,
    /// The flag button that opens the country list.
    FlagButton,
    /// The country search box.
    SearchBox,
    /// A row of the country list.
    CountryRow(CountryCode),
    Outside,
}

/// Result of handling one terminal event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoopControl {
    Continue,
    /// Leave and report the entered number.
    Confirm,
    /// Leave without confirming.
    Quit,
}
