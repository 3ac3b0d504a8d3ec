use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::config::TimeFormat;
use crate::models::PrayerName;
use crate::schedule::{CountdownState, PrayerSchedule};
use crate::tui::theme;
use crate::utils::format::format_clock;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    schedule: Option<&PrayerSchedule>,
    countdown: &CountdownState,
    format: TimeFormat,
) {
    let block = Block::default()
        .title(Span::styled(" Today ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let items: Vec<ListItem> = PrayerName::ALL
        .iter()
        .map(|&name| {
            let time = schedule.and_then(|s| s.get(name));
            let time_str = format_clock(time, format);
            let is_active = countdown.active == Some(name);

            let line = if is_active {
                Line::from(vec![
                    Span::styled(format!(" ▸ {:<9}", name.as_str()), theme::active_row()),
                    Span::styled(format!("{:>8}", time_str), theme::active_row()),
                    Span::styled(format!("   - {}", countdown.remaining()), theme::active_row()),
                ])
            } else if !name.is_countdown_eligible() {
                Line::from(vec![
                    Span::styled(format!("   {:<9}", name.as_str()), theme::dim()),
                    Span::styled(format!("{:>8}", time_str), theme::dim()),
                ])
            } else {
                Line::from(vec![
                    Span::styled(format!("   {:<9}", name.as_str()), theme::bold()),
                    Span::styled(
                        format!("{:>8}", time_str),
                        theme::dim().add_modifier(Modifier::BOLD),
                    ),
                ])
            };

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
