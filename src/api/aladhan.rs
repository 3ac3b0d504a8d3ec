use chrono::{Duration, NaiveDate};
use log::{debug, info, warn};
use reqwest::blocking::Client;

use crate::api::error::ApiError;
use crate::api::types::{parse_timings_response, DailyTimings};
use crate::config::settings::ApiConfig;
use crate::models::PrayerSettings;

/// Blocking client for the Aladhan timings API.
#[derive(Clone)]
pub struct TimingsClient {
    http: Client,
    base_url: String,
}

impl TimingsClient {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(api.base_url.clone(), std::time::Duration::from_secs(api.timeout_secs))
    }

    /// Timings for `date` at a coordinate. Preferred over the by-city lookup.
    pub fn fetch_by_coords(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        settings: PrayerSettings,
    ) -> Result<DailyTimings, ApiError> {
        let url = format!("{}/timings/{}", self.base_url, date_path(date));
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("method", settings.method.to_string()),
            ("school", settings.school.to_string()),
        ];
        self.get(&url, &query, date)
    }

    /// Less accurate fallback when only a city and country are known.
    pub fn fetch_by_city(
        &self,
        date: NaiveDate,
        city: &str,
        country: &str,
        settings: PrayerSettings,
    ) -> Result<DailyTimings, ApiError> {
        let url = format!("{}/timingsByCity/{}", self.base_url, date_path(date));
        let query = [
            ("city", city.to_string()),
            ("country", country.to_string()),
            ("method", settings.method.to_string()),
            ("school", settings.school.to_string()),
        ];
        self.get(&url, &query, date)
    }

    /// Seven days starting at `start`, fetched concurrently. Days that fail are left out.
    pub fn fetch_week(
        &self,
        start: NaiveDate,
        latitude: f64,
        longitude: f64,
        settings: PrayerSettings,
    ) -> Vec<DailyTimings> {
        let dates: Vec<NaiveDate> = (0..7).map(|i| start + Duration::days(i)).collect();

        let results: Vec<Result<DailyTimings, ApiError>> = std::thread::scope(|s| {
            let handles: Vec<_> = dates
                .iter()
                .map(|date| s.spawn(move || self.fetch_by_coords(*date, latitude, longitude, settings)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(Err(ApiError::InvalidResponse)))
                .collect()
        });

        let mut week = Vec::with_capacity(7);
        for (date, result) in dates.iter().zip(results) {
            match result {
                Ok(day) => week.push(day),
                Err(e) => warn!("Dropping {} from weekly table: {}", date, e),
            }
        }
        info!("Fetched {}/7 days of timings", week.len());
        week
    }

    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        date: NaiveDate,
    ) -> Result<DailyTimings, ApiError> {
        debug!("GET {} {:?}", url, query);
        let response = self.http.get(url).query(query).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        parse_timings_response(&body, date)
    }
}

/// The API takes dates as DD-MM-YYYY path segments.
fn date_path(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_path_is_day_first() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
        assert_eq!(date_path(d), "03-10-2026");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = TimingsClient::new("http://localhost:9/v1/", std::time::Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:9/v1");
    }

    #[test]
    fn unreachable_host_is_an_http_error() {
        // port 9 (discard) is closed on test machines
        let client = TimingsClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(2)).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let err = client
            .fetch_by_coords(date, 23.8, 90.4, PrayerSettings::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
        assert!(client.fetch_week(date, 23.8, 90.4, PrayerSettings::default()).is_empty());
    }
}
