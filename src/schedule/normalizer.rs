use chrono::NaiveTime;
use std::collections::HashMap;

use crate::models::PrayerName;

/// A local wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // Range is checked in `new`, so this cannot fall through.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

/// Parse an API clock string such as `"05:00"`, `"05:00 (BST)"`, `"05:00(BST)"`
/// or `"05:00:30"`.
///
/// The minute is the leading one or two digits after the first `:`; whatever
/// follows (seconds, a zone annotation) is ignored. Malformed input returns
/// `None` (rendered `--:--`).
pub fn parse_clock_time(raw: &str) -> Option<ClockTime> {
    let (hour, rest) = raw.trim().split_once(':')?;
    let hour = parse_component(hour)?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let minute = parse_component(&rest[..digits])?;
    ClockTime::new(hour, minute)
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// One day's six prayer slots for a location. Each slot may be unknown.
///
/// Built once per fetch and never mutated; a new fetch replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrayerSchedule {
    slots: [Option<ClockTime>; 6],
}

impl PrayerSchedule {
    /// Normalize the raw `name -> "HH:MM"` map returned by the timings API.
    /// Keys outside the six slot names (Imsak, Midnight, ...) are ignored.
    pub fn from_timings(raw: &HashMap<String, String>) -> Self {
        let mut schedule = Self::default();
        for name in PrayerName::ALL {
            let parsed = raw.get(name.as_str()).and_then(|s| parse_clock_time(s));
            if parsed.is_none() {
                log::debug!("no usable time for {} in {:?}", name, raw.get(name.as_str()));
            }
            schedule.slots[name.index()] = parsed;
        }
        schedule
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (PrayerName, &'a str)>,
    {
        let mut schedule = Self::default();
        for (name, raw) in pairs {
            schedule.slots[name.index()] = parse_clock_time(raw);
        }
        schedule
    }

    pub fn get(&self, name: PrayerName) -> Option<ClockTime> {
        self.slots[name.index()]
    }

    /// All six slots in display order.
    pub fn iter(&self) -> impl Iterator<Item = (PrayerName, Option<ClockTime>)> + '_ {
        PrayerName::ALL.iter().map(move |n| (*n, self.get(*n)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
