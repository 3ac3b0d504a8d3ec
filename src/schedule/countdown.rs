use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::PrayerName;
use crate::schedule::normalizer::{ClockTime, PrayerSchedule};
use crate::utils::format::format_hms;

/// The next prayer and time left until it, as of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownState {
    pub active: Option<PrayerName>,
    pub remaining_secs: i64,
    pub target: Option<DateTime<Tz>>,
}

impl Default for CountdownState {
    fn default() -> Self {
        Self {
            active: None,
            remaining_secs: 0,
            target: None,
        }
    }
}

impl CountdownState {
    /// `HH:MM:SS`, or `00:00:00` when nothing is known yet.
    pub fn remaining(&self) -> String {
        format_hms(self.remaining_secs)
    }

    /// Wall-clock time of the target in the location's zone.
    pub fn target_clock(&self) -> Option<ClockTime> {
        let target = self.target.as_ref()?;
        ClockTime::new(target.hour(), target.minute())
    }

    /// True when the target falls on the day after `now`'s local date.
    pub fn is_tomorrow(&self, now: DateTime<Utc>) -> bool {
        match &self.target {
            Some(target) => {
                let tz = target.timezone();
                target.date_naive() > now.with_timezone(&tz).date_naive()
            }
            None => false,
        }
    }
}

/// Pick the soonest upcoming prayer for `now` in the location's zone.
///
/// Each call is independent; the result depends only on the three inputs.
/// Without a schedule or a zone there is no active prayer.
pub fn compute_countdown(
    now: DateTime<Utc>,
    schedule: Option<&PrayerSchedule>,
    tz: Option<Tz>,
) -> CountdownState {
    let (Some(schedule), Some(tz)) = (schedule, tz) else {
        return CountdownState::default();
    };

    let now = now.with_nanosecond(0).unwrap_or(now);
    let today = now.with_timezone(&tz).date_naive();

    let mut best: Option<(PrayerName, i64, DateTime<Tz>)> = None;
    for name in PrayerName::COUNTDOWN {
        let Some(time) = schedule.get(name) else {
            continue;
        };
        let Some(target) = next_occurrence(tz, today, time, now) else {
            continue;
        };
        let secs = target.signed_duration_since(now).num_seconds().max(0);
        if secs == 0 {
            continue;
        }
        // strict `<` keeps the earlier prayer on ties
        if best.as_ref().is_none_or(|(_, b, _)| secs < *b) {
            best = Some((name, secs, target));
        }
    }

    match best {
        Some((name, secs, target)) => CountdownState {
            active: Some(name),
            remaining_secs: secs,
            target: Some(target),
        },
        None => CountdownState::default(),
    }
}

/// Today's occurrence of `time` in `tz`, or tomorrow's if today's is at or before `now`.
pub fn next_occurrence(
    tz: Tz,
    today: NaiveDate,
    time: ClockTime,
    now: DateTime<Utc>,
) -> Option<DateTime<Tz>> {
    let target = resolve_local(tz, today, time.to_naive_time())?;
    if target.with_timezone(&Utc) > now {
        return Some(target);
    }
    resolve_local(tz, today.succ_opt()?, time.to_naive_time())
}

/// Ambiguous local times take the earlier instant; times inside a DST gap
/// move forward by the hour that was skipped.
fn resolve_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz.from_local_datetime(&(naive + Duration::hours(1))).earliest(),
    }
}
