use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(12, 20, 22);
pub const SURFACE: Color = Color::Rgb(20, 31, 34);
pub const BORDER: Color = Color::Rgb(40, 62, 66);
pub const TEXT: Color = Color::Rgb(214, 228, 224);
pub const TEXT_DIM: Color = Color::Rgb(108, 132, 130);
pub const TEAL: Color = Color::Rgb(64, 170, 150);
pub const GREEN: Color = Color::Rgb(92, 168, 112);
pub const AMBER: Color = Color::Rgb(222, 164, 72);
pub const RED: Color = Color::Rgb(196, 88, 72);
pub const HIGHLIGHT: Color = Color::Rgb(30, 52, 54);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn accent() -> Style {
    Style::default().fg(TEAL)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

/// Row style for the prayer being counted down to.
pub fn active_row() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}
