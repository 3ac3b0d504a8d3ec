use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use log::warn;

/// Parse an IANA zone name such as `"Asia/Dhaka"`.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// The zone the host is configured with, if it can be detected and is a known IANA name.
pub fn host_timezone() -> Option<Tz> {
    match iana_time_zone::get_timezone() {
        Ok(name) => parse_timezone(&name),
        Err(e) => {
            warn!("Could not detect host timezone: {}", e);
            None
        }
    }
}

/// Use the location's zone when it is known and valid, the host's zone otherwise.
pub fn resolve_timezone(location_zone: Option<&str>) -> Option<Tz> {
    if let Some(name) = location_zone {
        match parse_timezone(name) {
            Some(tz) => return Some(tz),
            None => warn!("Unknown timezone '{}', falling back to host zone", name),
        }
    }
    host_timezone()
}

/// The calendar date at `now` in `tz`, or in the host's local zone when no zone is known.
pub fn local_today(now: DateTime<Utc>, tz: Option<Tz>) -> NaiveDate {
    match tz {
        Some(tz) => now.with_timezone(&tz).date_naive(),
        None => now.with_timezone(&Local).date_naive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iana_names() {
        assert_eq!(parse_timezone("Asia/Dhaka"), Some(chrono_tz::Asia::Dhaka));
        assert_eq!(parse_timezone(" Europe/London "), Some(chrono_tz::Europe::London));
        assert_eq!(parse_timezone("Mars/Olympus"), None);
        assert_eq!(parse_timezone(""), None);
    }

    #[test]
    fn location_zone_wins_over_host() {
        assert_eq!(resolve_timezone(Some("America/Chicago")), Some(chrono_tz::America::Chicago));
    }

    #[test]
    fn today_follows_location_zone() {
        use chrono::TimeZone;
        // 20:00 UTC on the 14th is already the 15th in Dhaka
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 20, 0, 0).unwrap();
        assert_eq!(local_today(now, Some(chrono_tz::Asia::Dhaka)), NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(local_today(now, Some(chrono_tz::America::Chicago)), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }

    #[test]
    fn invalid_location_zone_falls_back_to_host() {
        assert_eq!(resolve_timezone(Some("Nowhere/Special")), host_timezone());
        assert_eq!(resolve_timezone(None), host_timezone());
    }
}
