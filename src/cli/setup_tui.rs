use std::borrow::Cow;
use std::cmp::Ordering;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEventKind};
use log::warn;
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::api::TimingsClient;
use crate::cli::handlers::location_label;
use crate::config::{AppConfig, TimeFormat};
use crate::models::{PrayerSettings, CALC_METHODS, SCHOOLS};
use crate::schedule::zone::parse_timezone;
use crate::schedule::{local_today, resolve_timezone};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;

// ─── Wizard steps ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Welcome,
    LocationName,
    Country,
    Latitude,
    Longitude,
    CalcMethod,
    School,
    TimeFormat,
    Confirm,
}

// ─── Wizard state ─────────────────────────────────────────────────────────────

struct SetupWizard {
    step: Step,
    input: String,
    error: Option<String>,

    location_name: String,
    country: String,
    latitude: f64,
    longitude: f64,
    method_idx: usize,
    school_idx: usize,
    format_idx: usize, // 0 = 12h, 1 = 24h

    should_quit: bool,
    confirmed: bool,
}

impl SetupWizard {
    fn new(existing: &AppConfig) -> Self {
        let (city, country) = match existing.location.label.split_once(',') {
            Some((city, country)) => (city.trim().to_string(), country.trim().to_string()),
            None => (existing.location.label.clone(), String::new()),
        };

        let mut wizard = Self {
            step: Step::Welcome,
            input: String::new(),
            error: None,

            location_name: city,
            country,
            latitude: existing.location.latitude,
            longitude: existing.location.longitude,
            method_idx: 0,
            school_idx: 0,
            format_idx: if existing.display.time_format == TimeFormat::H24 { 1 } else { 0 },

            should_quit: false,
            confirmed: false,
        };
        wizard.select_settings(existing.calculation);
        wizard
    }

    fn select_settings(&mut self, settings: PrayerSettings) {
        self.method_idx = CALC_METHODS
            .iter()
            .position(|m| m.id == settings.method)
            .unwrap_or(0);
        self.school_idx = SCHOOLS
            .iter()
            .position(|s| s.id == settings.school)
            .unwrap_or(0);
    }

    fn step_number(&self) -> usize {
        match self.step {
            Step::Welcome => 0,
            Step::LocationName => 1,
            Step::Country => 2,
            Step::Latitude => 3,
            Step::Longitude => 4,
            Step::CalcMethod => 5,
            Step::School => 6,
            Step::TimeFormat => 7,
            Step::Confirm => 8,
        }
    }

    const TOTAL_STEPS: usize = 8;

    fn advance(&mut self) {
        self.error = None;
        self.step = match self.step {
            Step::Welcome => Step::LocationName,
            Step::LocationName => Step::Country,
            Step::Country => Step::Latitude,
            Step::Latitude => Step::Longitude,
            Step::Longitude => Step::CalcMethod,
            Step::CalcMethod => Step::School,
            Step::School => Step::TimeFormat,
            Step::TimeFormat => Step::Confirm,
            Step::Confirm => {
                self.confirmed = true;
                Step::Confirm
            }
        };
        self.prefill_input();
    }

    fn go_back(&mut self) {
        self.error = None;
        self.step = match self.step {
            Step::Welcome => {
                self.should_quit = true;
                Step::Welcome
            }
            Step::LocationName => Step::Welcome,
            Step::Country => Step::LocationName,
            Step::Latitude => Step::Country,
            Step::Longitude => Step::Latitude,
            Step::CalcMethod => Step::Longitude,
            Step::School => Step::CalcMethod,
            Step::TimeFormat => Step::School,
            Step::Confirm => Step::TimeFormat,
        };
        self.prefill_input();
    }

    fn prefill_input(&mut self) {
        self.input = match self.step {
            Step::LocationName => self.location_name.clone(),
            Step::Country => self.country.clone(),
            Step::Latitude => format!("{}", self.latitude),
            Step::Longitude => format!("{}", self.longitude),
            _ => String::new(),
        };
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.step {
            Step::Welcome => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                } else {
                    self.advance();
                }
            }

            Step::LocationName => self.handle_text_input(key, |s| {
                if s.trim().is_empty() {
                    Err("Please enter a city name".to_string())
                } else {
                    Ok(())
                }
            }),

            // optional; an empty country keeps the current method
            Step::Country => self.handle_text_input(key, |_| Ok(())),

            Step::Latitude => self.handle_text_input(key, |s| {
                s.parse::<f64>()
                    .map_err(|_| "Enter a valid latitude (e.g. 23.8103)".to_string())
                    .and_then(|v| {
                        if !(-90.0..=90.0).contains(&v) {
                            Err("Latitude must be between -90 and 90".to_string())
                        } else {
                            Ok(())
                        }
                    })
            }),

            Step::Longitude => self.handle_text_input(key, |s| {
                s.parse::<f64>()
                    .map_err(|_| "Enter a valid longitude (e.g. 90.4125)".to_string())
                    .and_then(|v| {
                        if !(-180.0..=180.0).contains(&v) {
                            Err("Longitude must be between -180 and 180".to_string())
                        } else {
                            Ok(())
                        }
                    })
            }),

            Step::CalcMethod => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.method_idx = self.method_idx.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.method_idx = (self.method_idx + 1).min(CALC_METHODS.len() - 1);
                }
                KeyCode::Enter => self.advance(),
                KeyCode::Esc => self.go_back(),
                _ => {}
            },

            Step::School => self.handle_choice(key, |w| &mut w.school_idx),
            Step::TimeFormat => self.handle_choice(key, |w| &mut w.format_idx),

            Step::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    self.confirmed = true;
                }
                KeyCode::Esc | KeyCode::Char('n') => self.go_back(),
                _ => {}
            },
        }
    }

    fn handle_choice<F>(&mut self, key: crossterm::event::KeyEvent, slot: F)
    where
        F: Fn(&mut Self) -> &mut usize,
    {
        match key.code {
            KeyCode::Left | KeyCode::Char('1') | KeyCode::Char('h') => *slot(self) = 0,
            KeyCode::Right | KeyCode::Char('2') | KeyCode::Char('l') => *slot(self) = 1,
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn handle_text_input<F>(&mut self, key: crossterm::event::KeyEvent, validate: F)
    where
        F: Fn(&str) -> std::result::Result<(), String>,
    {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => {
                let val = self.input.trim().to_string();
                match validate(&val) {
                    Ok(()) => {
                        self.commit_text_input(&val);
                        self.advance();
                    }
                    Err(e) => {
                        self.error = Some(e);
                    }
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
            }
            KeyCode::Tab => {
                // Reset to the built-in default location
                self.input = match self.step {
                    Step::LocationName => "Dhaka".to_string(),
                    Step::Country => "Bangladesh".to_string(),
                    Step::Latitude => "23.8103".to_string(),
                    Step::Longitude => "90.4125".to_string(),
                    _ => self.input.clone(),
                };
                self.error = None;
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.error = None;
            }
            _ => {}
        }
    }

    fn commit_text_input(&mut self, val: &str) {
        match self.step {
            Step::LocationName => {
                self.location_name = val.to_string();
            }
            Step::Country => {
                self.country = val.to_string();
                if !val.is_empty() {
                    self.select_settings(PrayerSettings::for_country(val));
                }
            }
            Step::Latitude => {
                self.latitude = val.parse().unwrap_or(self.latitude);
            }
            Step::Longitude => {
                self.longitude = val.parse().unwrap_or(self.longitude);
            }
            _ => {}
        }
    }

    fn settings(&self) -> PrayerSettings {
        PrayerSettings {
            method: CALC_METHODS[self.method_idx].id,
            school: SCHOOLS[self.school_idx].id,
        }
    }

    fn time_format(&self) -> TimeFormat {
        if self.format_idx == 0 { TimeFormat::H12 } else { TimeFormat::H24 }
    }

    fn build_config(&self, existing: &AppConfig) -> AppConfig {
        let mut config = existing.clone();
        let country = Some(self.country.as_str()).filter(|c| !c.is_empty());
        let label = location_label(&self.location_name, country);
        config.set_location(&label, self.latitude, self.longitude, None);
        config.calculation = self.settings();
        config.display.time_format = self.time_format();
        config
    }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// One wizard screen: heading, step-specific body and a key hint.
struct Page<'a> {
    title: &'a str,
    subtitle: &'a str,
    body: Vec<Line<'a>>,
    keys: &'a str,
}

impl<'a> Page<'a> {
    fn lines(self) -> Vec<Line<'a>> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(self.title, theme::accent().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(Span::styled(self.subtitle, theme::dim())),
            Line::from(""),
        ];
        lines.extend(self.body);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(self.keys, theme::dim())));
        lines
    }
}

fn option_line(label: &str, selected: bool) -> Line<'_> {
    if selected {
        Line::from(vec![
            Span::styled("  ◉  ", theme::accent()),
            Span::styled(label, theme::accent().add_modifier(Modifier::BOLD)),
        ])
    } else {
        Line::from(vec![
            Span::styled("  ○  ", theme::dim()),
            Span::styled(label, theme::dim()),
        ])
    }
}

fn field_line<'a>(name: &'a str, value: impl Into<Cow<'a, str>>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", name), theme::dim()),
        Span::styled(value, theme::bold()),
    ])
}

const CHOICE_KEYS: &str = "←→  or  1 2  choose   ·   Enter  confirm   ·   Esc  back";

fn page(wizard: &SetupWizard, width: u16) -> Page<'_> {
    match wizard.step {
        Step::Welcome => Page {
            title: "Welcome to waqt",
            subtitle: "Daily prayer times with a live countdown to the next one.",
            body: std::iter::once(Line::from(Span::styled("This wizard will configure:", theme::dim())))
                .chain(
                    ["Your location", "Calculation method and Asr school", "12- or 24-hour clock"]
                        .into_iter()
                        .map(|item| {
                            Line::from(vec![
                                Span::styled("  ●  ", theme::accent()),
                                Span::styled(item, theme::dim()),
                            ])
                        }),
                )
                .collect(),
            keys: "Enter  begin   ·   Esc  cancel",
        },
        Step::CalcMethod => Page {
            title: "Calculation Method",
            subtitle: "Authority used by the prayer-time service",
            body: CALC_METHODS
                .iter()
                .enumerate()
                .map(|(i, m)| option_line(m.label, i == wizard.method_idx))
                .collect(),
            keys: "↑↓  navigate   ·   Enter  select   ·   Esc  back",
        },
        Step::School => Page {
            title: "Asr Method",
            subtitle: "Affects the Asr prayer time",
            body: SCHOOLS
                .iter()
                .enumerate()
                .map(|(i, s)| option_line(s.label, i == wizard.school_idx))
                .collect(),
            keys: CHOICE_KEYS,
        },
        Step::TimeFormat => Page {
            title: "Clock Format",
            subtitle: "How prayer times are shown",
            body: ["12-hour  (7:50PM)", "24-hour  (19:50)"]
                .into_iter()
                .enumerate()
                .map(|(i, label)| option_line(label, i == wizard.format_idx))
                .collect(),
            keys: CHOICE_KEYS,
        },
        Step::Confirm => {
            let settings = wizard.settings();
            let country = if wizard.country.is_empty() { "-" } else { wizard.country.as_str() };
            Page {
                title: "Confirm Settings",
                subtitle: "Review your configuration:",
                body: vec![
                    field_line("Location", wizard.location_name.as_str()),
                    field_line("Country", country),
                    field_line(
                        "Coordinates",
                        format!("{:.4},  {:.4}", wizard.latitude, wizard.longitude),
                    ),
                    field_line("Method", settings.method_label()),
                    field_line("Asr", settings.school_label()),
                    field_line("Clock", wizard.time_format().as_str()),
                ],
                keys: "Enter  save   ·   Esc  go back",
            }
        }
        Step::LocationName | Step::Country | Step::Latitude | Step::Longitude => {
            text_page(wizard, width)
        }
    }
}

fn text_page(wizard: &SetupWizard, width: u16) -> Page<'_> {
    let (title, subtitle, hint) = match wizard.step {
        Step::LocationName => (
            "City Name",
            "Where are you located? (used for display)",
            "e.g.  Dhaka,  Karachi,  London",
        ),
        Step::Country => (
            "Country",
            "Optional · picks the usual calculation method",
            "e.g.  Bangladesh  ·  leave empty to skip",
        ),
        Step::Latitude => (
            "Latitude",
            "North/south position in degrees",
            "e.g.  23.8103  for Dhaka  ·  [Tab] to reset",
        ),
        _ => (
            "Longitude",
            "East/west position in degrees",
            "e.g.  90.4125  for Dhaka  ·  [Tab] to reset",
        ),
    };

    let cursor = if wizard.input.len() < 40 { "█" } else { "" };
    let input = format!(
        "{:<width$}",
        format!("  {}{}  ", wizard.input, cursor),
        width = width.saturating_sub(8) as usize
    );
    let input_style = if wizard.error.is_some() { theme::red() } else { theme::amber() };

    let feedback = match &wizard.error {
        Some(err) => Line::from(Span::styled(format!("  ✗  {}", err), theme::red())),
        None => Line::from(Span::styled(hint, theme::dim())),
    };

    Page {
        title,
        subtitle,
        body: vec![
            Line::from(""),
            Line::from(Span::styled(input, input_style.add_modifier(Modifier::BOLD))),
            Line::from(""),
            feedback,
        ],
        keys: "Enter  confirm   ·   Esc  back",
    }
}

fn draw(frame: &mut Frame, wizard: &SetupWizard) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme::base()), area);

    let [_, middle, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(26),
        Constraint::Min(0),
    ])
    .areas(area);
    let [_, box_area, _] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(64),
        Constraint::Min(0),
    ])
    .areas(middle);

    frame.render_widget(Clear, box_area);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent())
        .style(theme::surface())
        .title(Span::styled(
            "  وقت  waqt  ·  Setup  ",
            theme::accent().add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    let inner = outer_block.inner(box_area);
    frame.render_widget(outer_block, box_area);

    let [progress, _, content] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(progress_line(wizard.step_number(), SetupWizard::TOTAL_STEPS)),
        progress,
    );
    let lines = page(wizard, content.width).lines();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), content);
}

fn progress_line(current: usize, total: usize) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for i in 1..=total {
        spans.push(match i.cmp(&current) {
            Ordering::Less => Span::styled("● ", theme::green()),
            Ordering::Equal => Span::styled("◉ ", theme::accent()),
            Ordering::Greater => Span::styled("○ ", theme::dim()),
        });
    }
    Line::from(spans)
}

fn draw_fetching(frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme::base()), area);

    let fetching = Page {
        title: "Fetching prayer times…",
        subtitle: "Looking up the timezone for your location.",
        body: Vec::new(),
        keys: "",
    };
    let [_, lower] = Layout::vertical([Constraint::Percentage(40), Constraint::Min(0)]).areas(area);
    frame.render_widget(Paragraph::new(fetching.lines()).alignment(Alignment::Center), lower);
}

/// Ask the API once so the location's timezone is known before the first dashboard run.
fn learn_timezone(config: &mut AppConfig) {
    let today = local_today(Utc::now(), resolve_timezone(None));
    let fetched = TimingsClient::from_config(&config.api).and_then(|client| {
        client.fetch_by_coords(
            today,
            config.location.latitude,
            config.location.longitude,
            config.calculation,
        )
    });
    match fetched {
        Ok(day) => match day.timezone {
            Some(name) if parse_timezone(&name).is_some() => config.location.timezone = Some(name),
            other => warn!("Timings response had no usable timezone: {:?}", other),
        },
        Err(e) => warn!("Could not fetch timings during setup: {}", e),
    }
}

// ─── Public entry point ──────────────────────────────────────────────────────

pub fn run_setup_tui(config: &mut AppConfig) -> Result<()> {
    let mut wizard = SetupWizard::new(config);
    let mut terminal = ratatui::init();
    let events = EventHandler::new();

    let result = loop {
        if let Err(e) = terminal.draw(|frame| draw(frame, &wizard)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                wizard.handle_key(key);
                if wizard.should_quit {
                    break Ok(());
                }
                if wizard.confirmed {
                    if let Err(e) = terminal.draw(draw_fetching) {
                        break Err(e.into());
                    }
                    *config = wizard.build_config(config);
                    learn_timezone(config);
                    break config.save();
                }
            }
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn press(wizard: &mut SetupWizard, code: KeyCode) {
        wizard.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(wizard: &mut SetupWizard, text: &str) {
        wizard.input.clear();
        for c in text.chars() {
            press(wizard, KeyCode::Char(c));
        }
        press(wizard, KeyCode::Enter);
    }

    #[test]
    fn walks_through_all_steps() {
        let existing = AppConfig::default();
        let mut wizard = SetupWizard::new(&existing);
        assert_eq!(wizard.location_name, "Dhaka");
        assert_eq!(wizard.country, "Bangladesh");

        press(&mut wizard, KeyCode::Enter);
        type_text(&mut wizard, "Kabul");
        type_text(&mut wizard, "Afghanistan");
        // country pre-selects MWL / Shafi
        assert_eq!(wizard.settings(), PrayerSettings { method: 3, school: 0 });
        type_text(&mut wizard, "34.5553");
        type_text(&mut wizard, "69.2075");
        assert_eq!(wizard.step, Step::CalcMethod);
        press(&mut wizard, KeyCode::Enter);
        press(&mut wizard, KeyCode::Right);
        press(&mut wizard, KeyCode::Enter);
        press(&mut wizard, KeyCode::Char('2'));
        press(&mut wizard, KeyCode::Enter);
        assert_eq!(wizard.step, Step::Confirm);
        press(&mut wizard, KeyCode::Enter);
        assert!(wizard.confirmed);

        let config = wizard.build_config(&existing);
        assert_eq!(config.location.label, "Kabul, Afghanistan");
        assert_eq!(config.location.latitude, 34.5553);
        assert_eq!(config.calculation, PrayerSettings { method: 3, school: 1 });
        assert_eq!(config.display.time_format, TimeFormat::H24);
        assert!(config.location.timezone.is_none());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let mut wizard = SetupWizard::new(&AppConfig::default());
        wizard.step = Step::Latitude;
        type_text(&mut wizard, "123");
        assert_eq!(wizard.step, Step::Latitude);
        assert!(wizard.error.is_some());
    }

    #[test]
    fn method_list_stops_at_both_ends() {
        let mut wizard = SetupWizard::new(&AppConfig::default());
        wizard.step = Step::CalcMethod;
        for _ in 0..20 {
            press(&mut wizard, KeyCode::Down);
        }
        assert_eq!(wizard.method_idx, CALC_METHODS.len() - 1);
        for _ in 0..20 {
            press(&mut wizard, KeyCode::Up);
        }
        assert_eq!(wizard.method_idx, 0);
    }

    #[test]
    fn every_step_has_a_page() {
        let mut wizard = SetupWizard::new(&AppConfig::default());
        let steps = [
            Step::Welcome,
            Step::LocationName,
            Step::Country,
            Step::Latitude,
            Step::Longitude,
            Step::CalcMethod,
            Step::School,
            Step::TimeFormat,
            Step::Confirm,
        ];
        for step in steps {
            wizard.step = step;
            let page = page(&wizard, 60);
            assert!(!page.title.is_empty(), "{step:?}");
            assert!(!page.body.is_empty(), "{step:?}");
        }

        wizard.step = Step::CalcMethod;
        assert_eq!(page(&wizard, 60).body.len(), CALC_METHODS.len());
    }

    #[test]
    fn unreachable_service_leaves_timezone_unknown() {
        let mut config = AppConfig::default();
        config.api.base_url = "http://127.0.0.1:9".to_string();
        config.api.timeout_secs = 1;
        learn_timezone(&mut config);
        assert!(config.location.timezone.is_none());
    }

    #[test]
    fn esc_on_welcome_quits() {
        let mut wizard = SetupWizard::new(&AppConfig::default());
        press(&mut wizard, KeyCode::Esc);
        assert!(wizard.should_quit);
    }
}
