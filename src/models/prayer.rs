#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// All six schedule slots in display order.
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Sunrise,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// The five prayers that can carry a countdown. Sunrise is informational.
    pub const COUNTDOWN: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Sunrise => "Sunrise",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    pub fn is_countdown_eligible(&self) -> bool {
        *self != PrayerName::Sunrise
    }

    pub fn index(&self) -> usize {
        match self {
            PrayerName::Fajr => 0,
            PrayerName::Sunrise => 1,
            PrayerName::Dhuhr => 2,
            PrayerName::Asr => 3,
            PrayerName::Maghrib => 4,
            PrayerName::Isha => 5,
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sunrise_is_not_a_countdown_prayer() {
        assert!(!PrayerName::Sunrise.is_countdown_eligible());
        assert!(!PrayerName::COUNTDOWN.contains(&PrayerName::Sunrise));
        assert_eq!(PrayerName::COUNTDOWN.len(), 5);
    }

    #[test]
    fn index_matches_display_order() {
        for (i, name) in PrayerName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }
}
