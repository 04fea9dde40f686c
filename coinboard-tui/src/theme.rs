//! Neon-on-charcoal palette and the style helpers every widget draws with.
//!
//! - **Accent**: electric cyan (focus, headings)
//! - **Positive / Negative**: neon green / hot pink (24h change)
//! - **Warning**: neon orange (stale data, notices)
//! - **Neutral**: cool purple (secondary highlights, bars)
//! - **Muted**: steel blue (labels, hints, empty states)

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn warning_bold() -> Style {
    warning().add_modifier(Modifier::BOLD)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Green for gains, pink for losses, muted when the provider sent nothing.
pub fn change_style(change_pct: Option<f64>) -> Style {
    match change_pct {
        Some(v) if v > 0.0 => positive(),
        Some(v) if v < 0.0 => negative(),
        Some(_) => text(),
        None => muted(),
    }
}
