use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use log::{info, warn};

use crate::api::{DailyTimings, TimingsClient};
use crate::config::{AppConfig, TimeFormat};
use crate::models::{PrayerName, PrayerSettings, CALC_METHODS, SCHOOLS};
use crate::schedule::zone::parse_timezone;
use crate::schedule::{compute_countdown, local_today, resolve_timezone};
use crate::utils::format::{format_clock, normalize_city_name};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const TEAL: &str = "\x1b[38;2;64;170;150m";

// ─── Setup wizard ────────────────────────────────────────────────────────────

pub fn handle_setup(config: &mut AppConfig, reset: bool) -> Result<()> {
    if !reset && AppConfig::exists() {
        println!("waqt is already configured. Use --reset to reconfigure.");
        return Ok(());
    }
    crate::cli::setup_tui::run_setup_tui(config)
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(
    config: &mut AppConfig,
    city: Option<&str>,
    country: Option<&str>,
) -> Result<()> {
    let now = Utc::now();
    let known_tz = resolve_timezone(config.location.timezone.as_deref());
    let today = local_today(now, known_tz);

    let client = TimingsClient::from_config(&config.api)?;
    let (label, day) = match (city, country) {
        (Some(city), Some(country)) => {
            let day = client
                .fetch_by_city(today, city, country, config.calculation)
                .context("Failed to load prayer times")?;
            (format!("{}, {}", normalize_city_name(city), country), day)
        }
        _ => {
            let day = client
                .fetch_by_coords(
                    today,
                    config.location.latitude,
                    config.location.longitude,
                    config.calculation,
                )
                .context("Failed to load prayer times")?;
            remember_timezone(config, &day);
            (config.location.label.clone(), day)
        }
    };

    let tz = resolve_timezone(day.timezone.as_deref());
    let countdown = compute_countdown(now, Some(&day.schedule), tz);
    let format = config.display.time_format;

    println!();
    println_colored!(TEAL, "  Prayer Times — {} ({})", label, day.date.format("%d-%b-%Y"));
    println_colored!(DIM, "  {}", config.calculation.display_label());
    if let Some(tz) = tz {
        let local = now.with_timezone(&tz);
        println_colored!(DIM, "  Local time {} ({})", local.format(clock_pattern(format)), tz.name());
    }
    println!();

    let local_now = tz.map(|tz| now.with_timezone(&tz).time());
    for (name, time) in day.schedule.iter() {
        let time_str = format_clock(time, format);
        let is_active = countdown.active == Some(name);
        let is_past = match (time, local_now) {
            (Some(t), Some(n)) => t.to_naive_time() <= n,
            _ => false,
        };
        if is_active {
            println_colored!(AMBER, "▸ {:<10}  {:>7}   - {}", name.as_str(), time_str, countdown.remaining());
        } else if is_past || !name.is_countdown_eligible() {
            println_colored!(DIM, "  {:<10}  {:>7}", name.as_str(), time_str);
        } else {
            println_colored!(BOLD, "  {:<10}  {:>7}", name.as_str(), time_str);
        }
    }

    println!();
    match countdown.active {
        Some(next) => {
            let when = if countdown.is_tomorrow(now) { " (tomorrow)" } else { "" };
            println_colored!(AMBER, "  Next: {}{} in {}", next, when, countdown.remaining());
        }
        None => println_colored!(DIM, "  Next prayer unknown ({})", countdown.remaining()),
    }
    println!();
    Ok(())
}

/// Persist the zone the API reported for the saved coordinates.
fn remember_timezone(config: &mut AppConfig, day: &DailyTimings) {
    if !learn_timezone(config, day) {
        return;
    }
    if let Err(e) = config.save() {
        warn!("Could not save learned timezone: {:#}", e);
    }
}

/// Adopt the response's zone if it is a known IANA name. Returns true when the config changed.
fn learn_timezone(config: &mut AppConfig, day: &DailyTimings) -> bool {
    let Some(name) = day.timezone.as_deref() else {
        return false;
    };
    if parse_timezone(name).is_none() {
        warn!("Ignoring unknown timezone '{}' from timings response", name);
        return false;
    }
    if config.location.timezone.as_deref() == Some(name) {
        return false;
    }
    info!("Location timezone is now {}", name);
    config.location.timezone = Some(name.to_string());
    true
}

fn clock_pattern(format: TimeFormat) -> &'static str {
    match format {
        TimeFormat::H12 => "%I:%M %p",
        TimeFormat::H24 => "%H:%M",
    }
}

// ─── Week ────────────────────────────────────────────────────────────────────

pub fn handle_week(config: &AppConfig) -> Result<()> {
    let tz = resolve_timezone(config.location.timezone.as_deref());
    let today = local_today(Utc::now(), tz);
    let client = TimingsClient::from_config(&config.api)?;

    let week = client.fetch_week(
        today,
        config.location.latitude,
        config.location.longitude,
        config.calculation,
    );
    if week.is_empty() {
        return Err(anyhow!("Failed to load prayer times for the week"));
    }

    let format = config.display.time_format;
    println!();
    println_colored!(TEAL, "  Next 7 days — {}", config.location.label);
    println!();

    let mut header = format!("  {:<12}", "Date");
    for name in PrayerName::ALL {
        header.push_str(&format!("{:>9}", name.as_str()));
    }
    println_colored!(BOLD, "{}", header);

    for day in &week {
        let mut row = format!("  {:<12}", day.readable_date());
        for (_, time) in day.schedule.iter() {
            row.push_str(&format!("{:>9}", format_clock(time, format)));
        }
        println!("{}", row);
    }
    println!();
    Ok(())
}

// ─── Preferences ─────────────────────────────────────────────────────────────

pub fn handle_location(
    config: &mut AppConfig,
    label: &str,
    latitude: f64,
    longitude: f64,
    country: Option<&str>,
) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(anyhow!("Latitude must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(anyhow!("Longitude must be between -180 and 180"));
    }

    let label = location_label(label, country);
    config.set_location(&label, latitude, longitude, country);
    config.save()?;

    println_colored!(GREEN, "  ✓ Location set to {} ({:.4}, {:.4})", label, latitude, longitude);
    if country.is_some() {
        println_colored!(DIM, "  Using {}", config.calculation.display_label());
    }
    Ok(())
}

/// "Dhaka District" + "Bangladesh" -> "Dhaka, Bangladesh"
pub fn location_label(name: &str, country: Option<&str>) -> String {
    let city = normalize_city_name(name);
    let city = if city.is_empty() { name.trim().to_string() } else { city };
    match country {
        Some(country) if !country.trim().is_empty() => format!("{}, {}", city, country.trim()),
        _ => city,
    }
}

pub fn handle_method(config: &mut AppConfig, method: Option<u8>, school: Option<u8>) -> Result<()> {
    if method.is_none() && school.is_none() {
        print_catalogue(config.calculation);
        return Ok(());
    }

    let current = config.calculation;
    config.calculation = PrayerSettings::new(
        method.unwrap_or(current.method),
        school.unwrap_or(current.school),
    )?;
    config.save()?;
    println_colored!(GREEN, "  ✓ Based on: {}", config.calculation.display_label());
    Ok(())
}

fn print_catalogue(current: PrayerSettings) {
    println!();
    println_colored!(TEAL, "  Calculation Method");
    for m in CALC_METHODS {
        let mark = if m.id == current.method { "✓" } else { " " };
        println!("  {} {:>2}  {}", mark, m.id, m.label);
    }
    println!();
    println_colored!(TEAL, "  Asr Method");
    for s in SCHOOLS {
        let mark = if s.id == current.school { "✓" } else { " " };
        println!("  {} {:>2}  {}", mark, s.id, s.label);
    }
    println!();
}

pub fn handle_format(config: &mut AppConfig, format: &str) -> Result<()> {
    config.display.time_format = format.parse()?;
    config.save()?;
    println_colored!(GREEN, "  ✓ Clock format set to {}", config.display.time_format.as_str());
    Ok(())
}
