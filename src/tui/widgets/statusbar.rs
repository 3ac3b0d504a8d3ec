use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, loading: bool, error: Option<&str>) {
    if let Some(err) = error {
        let line = Line::from(vec![
            Span::styled("✗ ", theme::red()),
            Span::styled(err, theme::red()),
            Span::styled("  ·  [r] retry", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
        return;
    }
    if loading {
        let line = Line::from(Span::styled("Fetching prayer times…", theme::amber()));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
        return;
    }

    let hints = [
        ("[r]", " refresh  "),
        ("[w]", " week  "),
        ("[t]", " 12h/24h  "),
        ("[m]", " method  "),
        ("[s]", " school  "),
        ("[?]", " help  "),
        ("[q]", " quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in &hints {
        spans.push(Span::styled(*key, theme::accent()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
