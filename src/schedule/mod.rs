pub mod countdown;
pub mod normalizer;
pub mod zone;

pub use countdown::{compute_countdown, CountdownState};
pub use normalizer::{ClockTime, PrayerSchedule};
pub use zone::{local_today, resolve_timezone};
