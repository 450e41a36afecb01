//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Header and status bar background.
pub const ACCENT: Color = Color::Rgb(24, 60, 110);
/// Overdue, still-pending due dates.
pub const OVERDUE: Color = Color::Rgb(178, 48, 48);
/// Completed rows.
pub const DONE: Color = Color::DarkGray;
