use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::PrayerSettings;

fn default_latitude() -> f64 {
    23.8103
}
fn default_longitude() -> f64 {
    90.4125
}
fn default_label() -> String {
    "Dhaka, Bangladesh".to_string()
}
fn default_api_base() -> String {
    "https://api.aladhan.com/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// IANA zone learned from the last successful fetch.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "24h")]
    H24,
}

impl TimeFormat {
    pub fn toggle(self) -> Self {
        match self {
            TimeFormat::H12 => TimeFormat::H24,
            TimeFormat::H24 => TimeFormat::H12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::H12 => "12h",
            TimeFormat::H24 => "24h",
        }
    }
}

impl std::str::FromStr for TimeFormat {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "12h" | "12" => Ok(TimeFormat::H12),
            "24h" | "24" => Ok(TimeFormat::H24),
            _ => Err(anyhow::anyhow!("Unknown time format '{}'. Use 12h or 24h", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub time_format: TimeFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default = "default_settings")]
    pub calculation: PrayerSettings,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_settings() -> PrayerSettings {
    PrayerSettings::for_country("Bangladesh")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            calculation: default_settings(),
            display: DisplayConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "waqt").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    /// Point at a new place. The learned timezone belongs to the old place and is dropped.
    pub fn set_location(&mut self, label: &str, latitude: f64, longitude: f64, country: Option<&str>) {
        self.location.label = label.to_string();
        self.location.latitude = latitude;
        self.location.longitude = longitude;
        self.location.timezone = None;
        if let Some(country) = country {
            self.calculation = PrayerSettings::for_country(country);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.location.label, "Dhaka, Bangladesh");
        assert_eq!(config.calculation, PrayerSettings { method: 1, school: 1 });
        assert_eq!(config.display.time_format, TimeFormat::H12);
        assert!(config.location.timezone.is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.set_location("Kabul, Afghanistan", 34.5553, 69.2075, Some("Afghanistan"));
        config.location.timezone = Some("Asia/Kabul".to_string());
        config.display.time_format = TimeFormat::H24;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.location.label, "Kabul, Afghanistan");
        assert_eq!(loaded.location.timezone.as_deref(), Some("Asia/Kabul"));
        assert_eq!(loaded.calculation, PrayerSettings { method: 3, school: 0 });
        assert_eq!(loaded.display.time_format, TimeFormat::H24);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("time_format = \"24h\""));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[location]\nlabel = \"London\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.location.label, "London");
        assert_eq!(config.location.latitude, 23.8103);
        assert_eq!(config.api.base_url, "https://api.aladhan.com/v1");
    }

    #[test]
    fn changing_location_forgets_timezone() {
        let mut config = AppConfig::default();
        config.location.timezone = Some("Asia/Dhaka".to_string());
        config.set_location("Oslo", 59.91, 10.75, None);
        assert!(config.location.timezone.is_none());
        assert_eq!(config.calculation, PrayerSettings { method: 1, school: 1 });
    }

    #[test]
    fn time_format_parsing() {
        assert_eq!("24h".parse::<TimeFormat>().unwrap(), TimeFormat::H24);
        assert_eq!("12".parse::<TimeFormat>().unwrap(), TimeFormat::H12);
        assert!("am/pm".parse::<TimeFormat>().is_err());
        assert_eq!(TimeFormat::H12.toggle(), TimeFormat::H24);
    }
}
