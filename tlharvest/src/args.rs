//! Arguments for the tlharvest utility

use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

/// EU Trusted List certificate harvester
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct TlharvestArgs {
    /// Full path and filename of a JSON-formatted harvest settings file. Fields that are absent
    /// keep their defaults (granted CA/QC services declaring the QWAC ability, all countries).
    #[clap(short, long, help_heading = "COMMON OPTIONS")]
    pub settings: Option<String>,

    /// Full path and filename of a YAML-formatted configuration file for the log4rs logging
    /// mechanism. See <https://docs.rs/log4rs/latest/log4rs/> for details.
    #[clap(short, long, help_heading = "COMMON OPTIONS")]
    pub logging_config: Option<String>,

    /// Time to use when evaluating certificate expiry, expressed as the number of seconds since
    /// Unix epoch (defaults to current system time).
    #[clap(short = 'i', long, default_value_t = get_now_as_unix_epoch(), help_heading = "COMMON OPTIONS")]
    pub time_of_interest: u64,

    /// Territory codes to harvest. When present this enables country filtering and replaces the
    /// include list from the settings file.
    #[clap(long, value_delimiter = ',', help_heading = "FILTERING")]
    pub countries: Vec<String>,

    /// Full path of folder to receive one PEM file per harvested certificate (plus its resolved
    /// chain hops).
    #[clap(short = 'o', long, default_value = "certificates", help_heading = "OUTPUT")]
    pub certs_folder: String,

    /// Full path and filename of the CSV summary, one row per harvested certificate.
    #[clap(short = 'c', long, default_value = "output.csv", help_heading = "OUTPUT")]
    pub csv_file: String,
}

/// `get_now_as_unix_epoch` returns current time as seconds since the Unix epoch.
pub fn get_now_as_unix_epoch() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_secs(),
        Err(_) => 0,
    }
}
