//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Borders of the phone display and the country list.
pub const ACCENT: Color = Color::Rgb(226, 139, 122);
/// Background of the country list.
pub const LIST_BACKGROUND: Color = Color::Rgb(255, 255, 227);
/// Digit just before the caret.
pub const ACTIVE_DIGIT: Color = Color::Rgb(114, 0, 0);
/// Placeholder and key hints.
pub const MUTED: Color = Color::Rgb(120, 120, 120);
