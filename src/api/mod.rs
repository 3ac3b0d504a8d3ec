pub mod aladhan;
pub mod error;
pub mod types;

pub use aladhan::TimingsClient;
pub use types::DailyTimings;
