use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::config::{AppConfig, TimeFormat};
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, config: &AppConfig, now: DateTime<Utc>, tz: Option<Tz>) {
    let pattern = match config.display.time_format {
        TimeFormat::H12 => "%A, %b %d, %Y  ·  %I:%M:%S %p",
        TimeFormat::H24 => "%A, %b %d, %Y  ·  %H:%M:%S",
    };
    // Clock of the place being tracked, not of the machine running the app
    let clock_str = match tz {
        Some(tz) => now.with_timezone(&tz).format(pattern).to_string(),
        None => now.with_timezone(&Local).format(pattern).to_string(),
    };

    let title_line = Line::from(vec![
        Span::styled("  وقت  ", theme::accent().add_modifier(Modifier::BOLD)),
        Span::styled("waqt", theme::accent()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(config.location.label.as_str(), theme::bold()),
    ]);

    let date_line = Line::from(vec![
        Span::styled(clock_str, theme::amber()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(config.calculation.display_label(), theme::dim()),
    ]);

    let text = vec![title_line, Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
