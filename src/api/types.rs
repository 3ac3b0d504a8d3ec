use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

use crate::api::error::ApiError;
use crate::schedule::PrayerSchedule;

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TimingsResponse {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub data: Option<TimingsData>,
}

#[derive(Debug, Deserialize)]
pub struct TimingsData {
    #[serde(default)]
    pub timings: Option<HashMap<String, String>>,
    #[serde(default)]
    pub meta: Option<TimingsMeta>,
}

#[derive(Debug, Deserialize)]
pub struct TimingsMeta {
    #[serde(default)]
    pub timezone: Option<String>,
}

// ─── Domain ──────────────────────────────────────────────────────────────────

/// One day's schedule as returned by the timings API.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTimings {
    pub date: NaiveDate,
    pub schedule: PrayerSchedule,
    /// IANA zone from the response metadata.
    pub timezone: Option<String>,
}

impl DailyTimings {
    /// "Sat, 18 Oct"
    pub fn readable_date(&self) -> String {
        self.date.format("%a, %d %b").to_string()
    }
}

pub fn parse_timings_response(body: &str, date: NaiveDate) -> Result<DailyTimings, ApiError> {
    let response: TimingsResponse = serde_json::from_str(body)?;
    let data = response.data.ok_or(ApiError::InvalidResponse)?;
    let timings = data.timings.ok_or(ApiError::InvalidResponse)?;

    Ok(DailyTimings {
        date,
        schedule: PrayerSchedule::from_timings(&timings),
        timezone: data.meta.and_then(|m| m.timezone),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;
    use crate::schedule::ClockTime;

    const SAMPLE: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "05:00",
                "Sunrise": "06:15",
                "Dhuhr": "12:10",
                "Asr": "15:45",
                "Sunset": "18:17",
                "Maghrib": "18:20",
                "Isha": "19:50",
                "Imsak": "04:50",
                "Midnight": "00:05"
            },
            "date": { "readable": "14 Mar 2026", "timestamp": "1773446400" },
            "meta": {
                "latitude": 23.8103,
                "longitude": 90.4125,
                "timezone": "Asia/Dhaka",
                "method": { "id": 1, "name": "University of Islamic Sciences, Karachi" },
                "school": "HANAFI"
            }
        }
    }"#;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn parses_sample_response() {
        let parsed = parse_timings_response(SAMPLE, day()).unwrap();
        assert_eq!(parsed.timezone.as_deref(), Some("Asia/Dhaka"));
        assert_eq!(parsed.schedule.get(PrayerName::Fajr), ClockTime::new(5, 0));
        assert_eq!(parsed.schedule.get(PrayerName::Isha), ClockTime::new(19, 50));
        assert_eq!(parsed.readable_date(), "Sat, 14 Mar");
    }

    #[test]
    fn missing_timings_is_invalid() {
        let err = parse_timings_response(r#"{"code": 200, "data": {"meta": {}}}"#, day()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse));

        let err = parse_timings_response(r#"{"code": 400, "data": "Invalid date"}"#, day()).unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));

        let err = parse_timings_response(r#"{"code": 200}"#, day()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse));
    }

    #[test]
    fn missing_meta_leaves_timezone_unknown() {
        let body = r#"{"data": {"timings": {"Fajr": "04:31 (CEST)"}}}"#;
        let parsed = parse_timings_response(body, day()).unwrap();
        assert_eq!(parsed.timezone, None);
        assert_eq!(parsed.schedule.get(PrayerName::Fajr), ClockTime::new(4, 31));
        assert_eq!(parsed.schedule.get(PrayerName::Dhuhr), None);
    }
}
