use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// An Aladhan calculation method id and its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodOption {
    pub id: u8,
    pub label: &'static str,
}

pub const CALC_METHODS: &[MethodOption] = &[
    MethodOption { id: 1, label: "University of Islamic Sciences, Karachi" },
    MethodOption { id: 2, label: "Islamic Society of North America (ISNA)" },
    MethodOption { id: 3, label: "Muslim World League (MWL)" },
    MethodOption { id: 4, label: "Umm al-Qura, Makkah" },
    MethodOption { id: 5, label: "Egyptian General Authority of Survey" },
    MethodOption { id: 8, label: "Gulf Regional Organization" },
    MethodOption { id: 10, label: "Shia Ithna Ashari (Leva Research)" },
    MethodOption { id: 11, label: "Institute of Geophysics, University of Tehran" },
];

pub const SCHOOLS: &[MethodOption] = &[
    MethodOption { id: 0, label: "Shafi/Maliki/Hanbali" },
    MethodOption { id: 1, label: "Hanafi Juristic" },
];

/// Method + Asr school passed to the timings API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerSettings {
    pub method: u8,
    pub school: u8,
}

impl Default for PrayerSettings {
    fn default() -> Self {
        PrayerSettings::for_country("")
    }
}

impl PrayerSettings {
    pub fn new(method: u8, school: u8) -> Result<Self> {
        if !CALC_METHODS.iter().any(|m| m.id == method) {
            return Err(anyhow!("Unknown calculation method: {}", method));
        }
        if !SCHOOLS.iter().any(|s| s.id == school) {
            return Err(anyhow!("Unknown school: {}", school));
        }
        Ok(Self { method, school })
    }

    /// Country-based defaults; case-insensitive, unknown countries get ISNA / Hanafi.
    pub fn for_country(country: &str) -> Self {
        let (method, school) = match country.trim().to_uppercase().as_str() {
            "AFGHANISTAN" => (3, 0),
            "PAKISTAN" => (1, 1),
            "UNITED STATES" => (2, 1),
            "SAUDI ARABIA" => (4, 0),
            "BANGLADESH" => (1, 1),
            _ => (2, 1),
        };
        Self { method, school }
    }

    pub fn method_label(&self) -> &'static str {
        CALC_METHODS
            .iter()
            .find(|m| m.id == self.method)
            .map(|m| short_label(m.label))
            .unwrap_or("Custom Method")
    }

    pub fn school_label(&self) -> &'static str {
        SCHOOLS
            .iter()
            .find(|s| s.id == self.school)
            .map(|s| s.label)
            .unwrap_or("Standard")
    }

    pub fn display_label(&self) -> String {
        format!("{} · {}", self.method_label(), self.school_label())
    }

    /// Next method in catalogue order, wrapping. Unknown ids restart at the first entry.
    pub fn next_method(&self) -> Self {
        let pos = CALC_METHODS.iter().position(|m| m.id == self.method);
        let next = match pos {
            Some(i) => CALC_METHODS[(i + 1) % CALC_METHODS.len()].id,
            None => CALC_METHODS[0].id,
        };
        Self { method: next, school: self.school }
    }

    pub fn toggle_school(&self) -> Self {
        let school = if self.school == 0 { 1 } else { 0 };
        Self { method: self.method, school }
    }
}

fn short_label(label: &'static str) -> &'static str {
    match label.split_once(" (") {
        Some((head, _)) => head.trim(),
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_defaults() {
        assert_eq!(PrayerSettings::for_country("Bangladesh"), PrayerSettings { method: 1, school: 1 });
        assert_eq!(PrayerSettings::for_country("saudi arabia"), PrayerSettings { method: 4, school: 0 });
        assert_eq!(PrayerSettings::for_country("Afghanistan"), PrayerSettings { method: 3, school: 0 });
        assert_eq!(PrayerSettings::for_country("Norway"), PrayerSettings { method: 2, school: 1 });
        assert_eq!(PrayerSettings::default(), PrayerSettings { method: 2, school: 1 });
    }

    #[test]
    fn labels_drop_parenthetical() {
        let s = PrayerSettings { method: 2, school: 1 };
        assert_eq!(s.method_label(), "Islamic Society of North America");
        assert_eq!(s.display_label(), "Islamic Society of North America · Hanafi Juristic");
    }

    #[test]
    fn unknown_ids_get_fallback_labels() {
        let s = PrayerSettings { method: 99, school: 7 };
        assert_eq!(s.method_label(), "Custom Method");
        assert_eq!(s.school_label(), "Standard");
        assert!(PrayerSettings::new(99, 0).is_err());
        assert!(PrayerSettings::new(3, 2).is_err());
    }

    #[test]
    fn cycling_wraps() {
        let last = PrayerSettings { method: 11, school: 0 };
        assert_eq!(last.next_method().method, 1);
        assert_eq!(PrayerSettings { method: 4, school: 0 }.next_method().method, 5);
        assert_eq!(last.toggle_school().school, 1);
    }
}
