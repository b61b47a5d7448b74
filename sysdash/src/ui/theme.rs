//! Shared UI theme constants.

use ratatui::style::{Color, Modifier, Style};

use crate::notify::Severity;

pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(170, 170, 180);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);

pub const FOCUS_BORDER: Color = Color::Cyan;
pub const BUTTON: Color = Color::Rgb(120, 160, 220);
pub const DANGER: Color = Color::Red;

pub fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(FOCUS_BORDER)
    } else {
        Style::default()
    }
}

pub fn selected_row() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn severity_color(s: Severity) -> Color {
    match s {
        Severity::Info => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

/// Gauge color by fill level.
pub fn level_color(pct: f64) -> Color {
    if pct < 70.0 {
        Color::Green
    } else if pct < 90.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}
