use ratatui::style::{Color, Modifier, Style};

use crate::background::{PALETTE, fade};

pub const PRIMARY: Color = Color::Rgb(99, 102, 241);
pub const SECONDARY: Color = Color::Rgb(139, 92, 246);
pub const SUCCESS: Color = Color::Rgb(6, 214, 160);
pub const ACCENT: Color = Color::Rgb(247, 37, 133);

pub fn title() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border() -> Style {
    Style::default().fg(SECONDARY)
}

/// Input border while the typed text is not a valid URL.
pub fn border_invalid() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn code() -> Style {
    Style::default().fg(Color::White)
}

pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn busy() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn idle() -> Style {
    Style::default().fg(SUCCESS)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn success() -> Style {
    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

pub fn info() -> Style {
    Style::default().fg(SECONDARY)
}

/// Palette entry `idx` faded by `opacity`, for the background canvas.
pub fn palette(idx: usize, opacity: f64) -> Color {
    let (r, g, b) = fade(PALETTE[idx % PALETTE.len()], opacity);
    Color::Rgb(r, g, b)
}
