//! # phone_entry
//!
//! A phone number entry widget that keeps three things in step while the user
//! types: the raw digit buffer held by a shared keyboard, the nationally
//! formatted text shown on screen, and the caret in both.
//!
//! ## Layers
//!
//! - [`country`]: ISO country codes, calling codes and localised names.
//! - [`format`]: national formatting and dialling-code stripping behind the
//!   [`format::NumberFormatter`] trait.
//! - [`digits`], [`mapper`], [`caret`]: the digit buffer, the raw/formatted
//!   position map and the caret controller built on them.
//! - [`fields`], [`widget`]: field switching and the per-instance widget,
//!   which turns events into [`widget::Effect`]s.
//! - [`host`]: keyboard/text-field traits, callbacks and the delayed caret
//!   scheduler that apply those effects.
//! - [`tui`]: a terminal host built on ratatui and crossterm.
//!
//! ## Quick Start
//!
//! ```
//! use phone_entry::config::WidgetConfig;
//! use phone_entry::widget::PhoneNumberInput;
//!
//! let config = WidgetConfig {
//!     initial_value: Some("+27714834857".into()),
//!     ..WidgetConfig::default()
//! };
//! let mut widget = PhoneNumberInput::with_rules(&config);
//! assert_eq!(widget.formatted(), "71 483 4857");
//!
//! widget.keyboard_changed("7148348571");
//! assert_eq!(widget.full_number(), "+277148348571");
//! ```

pub mod caret;
pub mod config;
pub mod country;
pub mod digits;
pub mod error;
pub mod fields;
pub mod format;
pub mod host;
pub mod mapper;
pub mod widget;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
}
