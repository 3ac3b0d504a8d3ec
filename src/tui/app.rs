use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{KeyCode, KeyEventKind};
use log::{debug, info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::api::{DailyTimings, TimingsClient};
use crate::config::AppConfig;
use crate::schedule::zone::parse_timezone;
use crate::schedule::{compute_countdown, local_today, resolve_timezone, CountdownState, PrayerSchedule};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{header, next_prayer, prayers, statusbar, week};
use crate::utils::timer::ScopedTimer;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const LOAD_ERROR: &str = "Failed to load prayer times";

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    /// Where preference changes are written; `None` keeps them in memory only.
    config_path: Option<PathBuf>,
    pub should_quit: bool,

    pub schedule: Option<PrayerSchedule>,
    pub timezone: Option<Tz>,
    pub now: DateTime<Utc>,
    pub countdown: CountdownState,
    pub loading: bool,
    pub error: Option<String>,

    pub week: Vec<DailyTimings>,
    pub week_expanded: bool,
    pub week_loading: bool,

    // Generation counters; a response is applied only if it answers the latest request
    request_seq: u64,
    week_seq: u64,

    timer: Option<ScopedTimer>,
    events: Sender<Event>,
}

impl App {
    pub fn new(config: AppConfig, config_path: Option<PathBuf>, events: Sender<Event>) -> Self {
        let timezone = resolve_timezone(config.location.timezone.as_deref());
        App {
            view: View::Dashboard,
            config,
            config_path,
            should_quit: false,
            schedule: None,
            timezone,
            now: Utc::now(),
            countdown: CountdownState::default(),
            loading: false,
            error: None,
            week: Vec::new(),
            week_expanded: false,
            week_loading: false,
            request_seq: 0,
            week_seq: 0,
            timer: None,
            events,
        }
    }

    // ─── Fetching ────────────────────────────────────────────────────────────

    /// Fetch today's timings on a background thread. Supersedes any request in flight.
    pub fn request_timings(&mut self) {
        self.request_seq += 1;
        self.loading = true;
        self.error = None;

        let request = self.request_seq;
        let api = self.config.api.clone();
        let (lat, lon) = (self.config.location.latitude, self.config.location.longitude);
        let settings = self.config.calculation;
        let date = local_today(Utc::now(), self.timezone);
        let tx = self.events.clone();

        debug!("timings request #{} for {}", request, date);
        thread::spawn(move || {
            let result = TimingsClient::from_config(&api)
                .and_then(|client| client.fetch_by_coords(date, lat, lon, settings))
                .map_err(|e| e.to_string());
            let _ = tx.send(Event::Timings { request, result });
        });
    }

    pub fn request_week(&mut self) {
        self.week_seq += 1;
        self.week_loading = true;

        let request = self.week_seq;
        let api = self.config.api.clone();
        let (lat, lon) = (self.config.location.latitude, self.config.location.longitude);
        let settings = self.config.calculation;
        let start = local_today(Utc::now(), self.timezone);
        let tx = self.events.clone();

        thread::spawn(move || {
            let days = match TimingsClient::from_config(&api) {
                Ok(client) => client.fetch_week(start, lat, lon, settings),
                Err(e) => {
                    warn!("Could not build HTTP client: {}", e);
                    Vec::new()
                }
            };
            let _ = tx.send(Event::Week { request, days });
        });
    }

    pub fn apply_timings(&mut self, request: u64, result: Result<DailyTimings, String>) {
        if request != self.request_seq {
            debug!("ignoring stale timings response #{} (latest #{})", request, self.request_seq);
            return;
        }
        self.loading = false;

        match result {
            Ok(day) => {
                match day.timezone.as_deref() {
                    Some(name) => match parse_timezone(name) {
                        Some(tz) => {
                            self.timezone = Some(tz);
                            if self.config.location.timezone.as_deref() != Some(name) {
                                info!("Location timezone is now {}", name);
                                self.config.location.timezone = Some(name.to_string());
                                self.persist();
                            }
                        }
                        None => warn!("Ignoring unknown timezone '{}' from timings response", name),
                    },
                    None => debug!("timings response carried no timezone"),
                }
                if day.schedule.is_empty() {
                    warn!("Timings for {} had no usable prayer times", day.date);
                }
                // Replace wholesale; the engine never sees a half-updated schedule
                self.schedule = Some(day.schedule);
                self.error = None;
                self.restart_timer();
                self.refresh_countdown();
            }
            Err(e) => {
                warn!("{}: {}", LOAD_ERROR, e);
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
    }

    pub fn apply_week(&mut self, request: u64, days: Vec<DailyTimings>) {
        if request != self.week_seq {
            debug!("ignoring stale week response #{}", request);
            return;
        }
        self.week_loading = false;
        self.week = days;
    }

    // ─── Countdown ───────────────────────────────────────────────────────────

    /// Replace the one-second timer. The previous timer is stopped and joined first.
    pub fn restart_timer(&mut self) {
        self.timer = None;
        let tx = self.events.clone();
        self.timer = Some(ScopedTimer::start(TICK_PERIOD, move || tx.send(Event::Tick).is_ok()));
    }

    pub fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    pub fn tick(&mut self) {
        self.now = Utc::now();
        self.refresh_countdown();
    }

    fn refresh_countdown(&mut self) {
        self.countdown = compute_countdown(self.now, self.schedule.as_ref(), self.timezone);
    }

    // ─── Input ───────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('r') => {
                self.request_timings();
                if self.week_expanded {
                    self.request_week();
                }
            }
            KeyCode::Char('w') => {
                self.week_expanded = !self.week_expanded;
                if self.week_expanded && self.week.is_empty() && !self.week_loading {
                    self.request_week();
                }
            }
            KeyCode::Char('t') => {
                self.config.display.time_format = self.config.display.time_format.toggle();
                self.persist();
            }
            KeyCode::Char('m') => {
                self.config.calculation = self.config.calculation.next_method();
                self.settings_changed();
            }
            KeyCode::Char('s') => {
                self.config.calculation = self.config.calculation.toggle_school();
                self.settings_changed();
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Dashboard;
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    /// Method or school changed: save, and refetch everything that depends on them.
    fn settings_changed(&mut self) {
        info!("Calculation settings: {}", self.config.calculation.display_label());
        self.persist();
        self.request_timings();
        self.week.clear();
        if self.week_expanded {
            self.request_week();
        } else {
            // any week fetch still in flight is for the old settings
            self.week_seq += 1;
            self.week_loading = false;
        }
    }

    fn persist(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            warn!("Could not save preferences: {:#}", e);
        }
    }

    // ─── Rendering ───────────────────────────────────────────────────────────

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);
        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], &self.config, self.now, self.timezone);
        statusbar::render(frame, outer_chunks[2], self.loading, self.error.as_deref());

        let body = if self.week_expanded {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(11)])
                .split(outer_chunks[1]);
            week::render(
                frame,
                rows[1],
                &self.week,
                self.week_loading,
                self.config.display.time_format,
            );
            rows[0]
        } else {
            outer_chunks[1]
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body);

        prayers::render(
            frame,
            columns[0],
            self.schedule.as_ref(),
            &self.countdown,
            self.config.display.time_format,
        );
        next_prayer::render(
            frame,
            columns[1],
            &self.countdown,
            self.now,
            self.config.display.time_format,
        );
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).max(12).min(area.height),
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [r]          ", "Refresh prayer times"),
            ("  [w]          ", "Show / hide the next 7 days"),
            ("  [t]          ", "Toggle 12h / 24h clock"),
            ("  [m]          ", "Next calculation method"),
            ("  [s]          ", "Toggle Asr school"),
            ("  [?]          ", "Toggle help"),
            ("  [q] / Esc    ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(key, theme::accent()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the dashboard event loop.
pub fn run(config: AppConfig) -> Result<()> {
    let config_path = AppConfig::config_path().ok();
    let events = EventHandler::new();
    let mut app = App::new(config, config_path, events.sender());

    let mut terminal = ratatui::init();
    app.restart_timer();
    app.request_timings();

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Tick) => app.tick(),
            Ok(Event::Timings { request, result }) => app.apply_timings(request, result),
            Ok(Event::Week { request, days }) => app.apply_week(request, days),
            Err(e) => break Err(e.into()),
        }
    };

    app.stop_timer();
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PrayerName, PrayerSettings};
    use chrono::{NaiveDate, TimeZone};
    use crossterm::event::{KeyEvent, KeyModifiers};
    use std::sync::mpsc;
    use tempfile::tempdir;

    fn offline_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.api.base_url = "http://127.0.0.1:9".to_string();
        config.api.timeout_secs = 1;
        config
    }

    fn day(timezone: &str, pairs: &[(PrayerName, &str)]) -> DailyTimings {
        DailyTimings {
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            schedule: PrayerSchedule::from_pairs(pairs.iter().copied()),
            timezone: Some(timezone.to_string()),
        }
    }

    fn dhaka_day() -> DailyTimings {
        day(
            "Asia/Dhaka",
            &[
                (PrayerName::Fajr, "05:00"),
                (PrayerName::Sunrise, "06:15"),
                (PrayerName::Dhuhr, "12:10"),
                (PrayerName::Asr, "15:45"),
                (PrayerName::Maghrib, "18:20"),
                (PrayerName::Isha, "19:50"),
            ],
        )
    }

    fn press(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    #[test]
    fn applies_latest_response_and_learns_zone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(offline_config(), Some(path.clone()), tx);

        app.request_seq = 1;
        app.loading = true;
        app.apply_timings(1, Ok(dhaka_day()));

        assert!(!app.loading);
        assert_eq!(app.timezone, Some(chrono_tz::Asia::Dhaka));
        assert!(app.schedule.is_some());

        // 06:09:30 UTC is 12:09:30 in Dhaka
        app.now = Utc.with_ymd_and_hms(2026, 3, 15, 6, 9, 30).unwrap();
        app.refresh_countdown();
        assert_eq!(app.countdown.active, Some(PrayerName::Dhuhr));
        assert_eq!(app.countdown.remaining(), "00:00:30");

        let saved = AppConfig::load_from(&path).unwrap();
        assert_eq!(saved.location.timezone.as_deref(), Some("Asia/Dhaka"));
    }

    #[test]
    fn unknown_response_zone_is_not_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let (tx, _rx) = mpsc::channel();
        let mut config = offline_config();
        config.location.timezone = Some("Asia/Dhaka".to_string());
        let mut app = App::new(config, Some(path.clone()), tx);

        app.request_seq = 1;
        let mut response = dhaka_day();
        response.timezone = Some("Mars/Olympus".to_string());
        app.apply_timings(1, Ok(response));

        assert_eq!(app.timezone, Some(chrono_tz::Asia::Dhaka));
        assert_eq!(app.config.location.timezone.as_deref(), Some("Asia/Dhaka"));
        assert!(!path.exists());
        assert!(app.schedule.is_some());
    }

    #[test]
    fn stale_responses_are_dropped() {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(offline_config(), None, tx);

        app.request_seq = 2;
        app.loading = true;
        app.apply_timings(1, Ok(dhaka_day()));
        assert!(app.schedule.is_none());
        assert!(app.loading);

        app.week_seq = 3;
        app.apply_week(2, vec![dhaka_day()]);
        assert!(app.week.is_empty());
    }

    #[test]
    fn schedule_is_swapped_wholesale() {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(offline_config(), None, tx);

        app.request_seq = 1;
        app.apply_timings(1, Ok(dhaka_day()));
        app.request_seq = 2;
        app.apply_timings(2, Ok(day("Asia/Dhaka", &[(PrayerName::Isha, "20:00")])));

        let schedule = app.schedule.as_ref().unwrap();
        assert_eq!(schedule.get(PrayerName::Fajr), None);
        assert!(schedule.get(PrayerName::Isha).is_some());
    }

    #[test]
    fn failed_fetch_keeps_previous_schedule() {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(offline_config(), None, tx);

        app.request_seq = 1;
        app.apply_timings(1, Ok(dhaka_day()));
        app.request_seq = 2;
        app.apply_timings(2, Err("connection refused".to_string()));

        assert_eq!(app.error.as_deref(), Some(LOAD_ERROR));
        assert_eq!(app.schedule, Some(dhaka_day().schedule));
    }

    #[test]
    fn timer_ticks_reach_the_event_channel() {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(offline_config(), None, tx);
        app.restart_timer();
        app.restart_timer();

        let event = rx.recv_timeout(Duration::from_secs(3)).unwrap();
        assert!(matches!(event, Event::Tick));
        app.stop_timer();
        assert!(app.timer.is_none());
    }

    #[test]
    fn setting_keys_persist_and_refetch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(offline_config(), Some(path.clone()), tx);
        let before = app.config.calculation;

        press(&mut app, 'm');
        assert_eq!(app.config.calculation, before.next_method());
        assert_eq!(app.request_seq, 1);
        assert!(app.loading);

        press(&mut app, 's');
        press(&mut app, 't');
        let saved = AppConfig::load_from(&path).unwrap();
        assert_eq!(saved.calculation, PrayerSettings {
            method: before.next_method().method,
            school: before.toggle_school().school,
        });
        assert_eq!(saved.display.time_format, crate::config::TimeFormat::H24);
    }

    #[test]
    fn help_and_quit_keys() {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new(offline_config(), None, tx);

        press(&mut app, '?');
        assert_eq!(app.view, View::Help);
        press(&mut app, '?');
        assert_eq!(app.view, View::Dashboard);
        press(&mut app, 'q');
        assert!(app.should_quit);
    }
}
