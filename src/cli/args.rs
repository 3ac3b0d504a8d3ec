use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "waqt", version, author, about = "Prayer times with a live countdown to the next prayer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// First-run setup wizard (location, calculation method, school, clock format)
    Setup {
        /// Reconfigure even if a config file already exists
        #[arg(long)]
        reset: bool,
    },
    /// Show today's prayer times and the countdown to the next prayer
    Times {
        /// Look up by city instead of the saved coordinates
        #[arg(long, requires = "country")]
        city: Option<String>,
        /// Country for the city lookup
        #[arg(long, requires = "city")]
        country: Option<String>,
    },
    /// Show prayer times for the next seven days
    Week,
    /// Set the location used for prayer times
    Location {
        /// Display name, e.g. "Dhaka"
        label: String,
        /// Latitude in degrees (-90..90)
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        /// Longitude in degrees (-180..180)
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        /// Country; also picks that country's default method and school
        #[arg(long)]
        country: Option<String>,
    },
    /// List calculation methods, or change method/school
    Method {
        /// Aladhan method id (see `waqt method`)
        #[arg(long)]
        method: Option<u8>,
        /// Asr school: 0 = Shafi/Maliki/Hanbali, 1 = Hanafi
        #[arg(long)]
        school: Option<u8>,
    },
    /// Set the clock format
    Format {
        /// 12h or 24h
        format: String,
    },
}
