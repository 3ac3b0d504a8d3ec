use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::api::DailyTimings;
use crate::config::TimeFormat;
use crate::models::PrayerName;
use crate::tui::theme;
use crate::utils::format::format_clock;

pub fn render(frame: &mut Frame, area: Rect, week: &[DailyTimings], loading: bool, format: TimeFormat) {
    let block = Block::default()
        .title(Span::styled(" Next 7 Days ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    if week.is_empty() {
        let msg = if loading { "  Loading…" } else { "  No data" };
        let paragraph = Paragraph::new(Span::styled(msg, theme::dim())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(
        std::iter::once(Cell::from("Date")).chain(PrayerName::ALL.iter().map(|p| Cell::from(p.as_str()))),
    )
    .style(theme::accent().add_modifier(Modifier::BOLD));

    let rows = week.iter().map(|day| {
        let cells = std::iter::once(Cell::from(day.readable_date()))
            .chain(day.schedule.iter().map(|(_, t)| Cell::from(format_clock(t, format))));
        Row::new(cells).style(theme::bold())
    });

    let mut widths = vec![Constraint::Length(12)];
    widths.extend(PrayerName::ALL.iter().map(|_| Constraint::Length(9)));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
