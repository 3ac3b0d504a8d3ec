use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::config::TimeFormat;
use crate::schedule::CountdownState;
use crate::tui::theme;
use crate::utils::format::format_clock;

// Quadrant glyphs are 4 cells wide and 4 rows tall
const GLYPH_WIDTH: u16 = 4;
const GLYPH_HEIGHT: u16 = 4;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    countdown: &CountdownState,
    now: DateTime<Utc>,
    format: TimeFormat,
) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let caption = match countdown.active {
        None => Line::from(Span::styled("No upcoming prayer", theme::dim())),
        Some(prayer) => {
            let mut spans = vec![Span::styled(
                prayer.as_str().to_uppercase(),
                theme::accent().add_modifier(Modifier::BOLD),
            )];
            if let Some(at) = countdown.target_clock() {
                spans.push(Span::styled("  at  ", theme::dim()));
                spans.push(Span::styled(format_clock(Some(at), format), theme::bold()));
            }
            if countdown.is_tomorrow(now) {
                spans.push(Span::styled("  (tomorrow)", theme::dim()));
            }
            Line::from(spans)
        }
    };

    let remaining = countdown.remaining();
    let big_width = GLYPH_WIDTH * remaining.chars().count() as u16;

    // Fall back to a plain line when the panel is too small for big digits
    if inner.width < big_width || inner.height < GLYPH_HEIGHT + 2 {
        let lines = vec![
            caption,
            Line::from(Span::styled(remaining, theme::amber().add_modifier(Modifier::BOLD))),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        return;
    }

    let top = inner.y + (inner.height - GLYPH_HEIGHT - 2) / 2;
    let caption_area = Rect { x: inner.x, y: top, width: inner.width, height: 1 };
    frame.render_widget(Paragraph::new(caption).alignment(Alignment::Center), caption_area);

    let digits_area = Rect {
        x: inner.x + (inner.width - big_width) / 2,
        y: top + 2,
        width: big_width,
        height: GLYPH_HEIGHT,
    };
    let big = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(theme::amber())
        .lines(vec![remaining.into()])
        .build();
    frame.render_widget(big, digits_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;
    use chrono::TimeZone;
    use ratatui::{backend::TestBackend, Terminal};

    fn isha_state() -> CountdownState {
        CountdownState {
            active: Some(PrayerName::Isha),
            remaining_secs: 3600,
            target: Some(chrono_tz::Asia::Dhaka.with_ymd_and_hms(2026, 3, 14, 19, 50, 0).unwrap()),
        }
    }

    fn rendered(width: u16, height: u16, state: &CountdownState, format: TimeFormat) -> String {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 50, 0).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state, now, format))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn wide_panel_uses_big_digits() {
        let screen = rendered(60, 12, &isha_state(), TimeFormat::H12);
        assert!(screen.contains("ISHA"));
        assert!(screen.contains("7:50PM"));
        assert!(!screen.contains("01:00:00"));
    }

    #[test]
    fn narrow_panel_falls_back_to_text() {
        let screen = rendered(24, 6, &isha_state(), TimeFormat::H24);
        assert!(screen.contains("01:00:00"));
    }

    #[test]
    fn target_time_follows_clock_format() {
        let screen = rendered(60, 12, &isha_state(), TimeFormat::H24);
        assert!(screen.contains("19:50"));
        assert!(!screen.contains("PM"));
    }

    #[test]
    fn placeholder_without_a_prayer() {
        let screen = rendered(60, 12, &CountdownState::default(), TimeFormat::H24);
        assert!(screen.contains("No upcoming prayer"));
    }
}
