pub mod method;
pub mod prayer;

pub use method::{PrayerSettings, CALC_METHODS, SCHOOLS};
pub use prayer::PrayerName;
