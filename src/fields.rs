//! Enumerations and field types for the phone entry widget.
//!
//! This module defines the small value types shared by the widget, its
//! configuration and the CLI: which logical field receives keyboard input,
//! how large the widget is drawn, and how caret motion is inferred from edits.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Logical buffer currently receiving events from the shared keyboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ActiveField {
    #[default]
    PhoneDigits,
    CountrySearch,
}

impl ActiveField {
    /// Buffer name used when addressing the keyboard collaborator.
    pub fn target_name(self) -> &'static str {
        match self {
            ActiveField::PhoneDigits => "phone",
            ActiveField::CountrySearch => "countrySearch",
        }
    }
}

/// Interaction that can move focus between the two fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    /// The phone display (or one of its digits) was clicked.
    PhoneFocused,
    /// The flag button toggled the country list open.
    CountryListOpened,
    /// The search box gained focus.
    SearchFocused,
    /// A country was picked from the list.
    CountrySelected,
}

/// What the widget must do to the search buffer after a focus transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBufferAction {
    Keep,
    Clear,
}

/// Two-state switch deciding which buffer the keyboard edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSwitch {
    active: ActiveField,
}

impl FieldSwitch {
    pub fn active(&self) -> ActiveField {
        self.active
    }

    /// Apply a focus event and report whether the search text must be discarded.
    pub fn transition(&mut self, event: FocusEvent) -> SearchBufferAction {
        match event {
            FocusEvent::PhoneFocused => {
                self.active = ActiveField::PhoneDigits;
                SearchBufferAction::Keep
            }
            FocusEvent::CountryListOpened | FocusEvent::SearchFocused => {
                self.active = ActiveField::CountrySearch;
                SearchBufferAction::Keep
            }
            FocusEvent::CountrySelected => {
                self.active = ActiveField::PhoneDigits;
                SearchBufferAction::Clear
            }
        }
    }
}

/// Key layout the keyboard should present for the active field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLayout {
    /// Numeric pad: digits, backspace, enter.
    Phone,
    /// Letters for country search.
    Default,
}

impl From<ActiveField> for KeyLayout {
    fn from(field: ActiveField) -> Self {
        match field {
            ActiveField::PhoneDigits => KeyLayout::Phone,
            ActiveField::CountrySearch => KeyLayout::Default,
        }
    }
}

/// Rendered width class of the widget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SizeVariant {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeVariant {
    /// Inner width of the phone display in terminal columns.
    pub fn display_width(self) -> u16 {
        match self {
            SizeVariant::Small => 16,
            SizeVariant::Medium => 21,
            SizeVariant::Large => 32,
        }
    }
}

/// How the caret is re-derived when the keyboard reports new buffer content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CaretStrategy {
    /// Move the caret by the change in buffer length.
    #[default]
    LengthDelta,
    /// Locate the edited region by diffing old and new content.
    Diff,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_starts_on_phone_digits() {
        assert_eq!(FieldSwitch::default().active(), ActiveField::PhoneDigits);
    }

    #[test]
    fn opening_list_and_selecting_country() {
        let mut switch = FieldSwitch::default();
        assert_eq!(switch.transition(FocusEvent::CountryListOpened), SearchBufferAction::Keep);
        assert_eq!(switch.active(), ActiveField::CountrySearch);

        assert_eq!(switch.transition(FocusEvent::SearchFocused), SearchBufferAction::Keep);
        assert_eq!(switch.active(), ActiveField::CountrySearch);

        assert_eq!(switch.transition(FocusEvent::CountrySelected), SearchBufferAction::Clear);
        assert_eq!(switch.active(), ActiveField::PhoneDigits);
    }

    #[test]
    fn focusing_phone_keeps_search_text() {
        let mut switch = FieldSwitch::default();
        switch.transition(FocusEvent::SearchFocused);
        assert_eq!(switch.transition(FocusEvent::PhoneFocused), SearchBufferAction::Keep);
        assert_eq!(switch.active(), ActiveField::PhoneDigits);
    }

    #[test]
    fn layout_follows_field() {
        assert_eq!(KeyLayout::from(ActiveField::PhoneDigits), KeyLayout::Phone);
        assert_eq!(KeyLayout::from(ActiveField::CountrySearch), KeyLayout::Default);
    }

    #[test]
    fn enums_use_kebab_case() {
        assert_eq!(serde_json::to_string(&CaretStrategy::LengthDelta).unwrap(), "\"length-delta\"");
        assert_eq!(serde_json::from_str::<SizeVariant>("\"large\"").unwrap(), SizeVariant::Large);
    }
}
