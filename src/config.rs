//! Runtime configuration and fixed sampling policy.
//!
//! Everything that varies between installs (API key, endpoint bases, log
//! file) comes from the environment, optionally seeded from a `.env` file.
//! The sampling policy for the Earth and Mars feeds is fixed and lives here
//! as named constants.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Number of calendar days, counting today, aggregated by the Earth feed.
pub const EARTH_WINDOW_DAYS: i64 = 7;

/// Maximum number of random sols tried by the Mars feed before giving up.
pub const MARS_MAX_ATTEMPTS: usize = 5;

/// Lowest sol (inclusive) the Mars feed samples from.
pub const MARS_SOL_MIN: u32 = 100;

/// Upper bound (exclusive) of the sampled sol range.
pub const MARS_SOL_MAX: u32 = 3000;

const DEFAULT_API_KEY: &str = "DEMO_KEY";
const DEFAULT_API_URL: &str = "https://api.nasa.gov";
const DEFAULT_ARCHIVE_URL: &str = "https://epic.gsfc.nasa.gov/archive/natural";

#[derive(Clone, Debug)]
pub struct Config {
    /// Opaque key appended to every `api.nasa.gov` request.
    pub api_key: String,
    /// Base of the JSON endpoints, without a trailing slash.
    pub api_url: String,
    /// Base of the EPIC image archive, without a trailing slash.
    pub archive_url: String,
    /// Where tracing output goes. `None` disables logging, since stdout is
    /// owned by the terminal UI.
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_key: env::var("NASA_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string()),
            api_url: base_url(env::var("NASA_API_URL").ok(), DEFAULT_API_URL),
            archive_url: base_url(env::var("EPIC_ARCHIVE_URL").ok(), DEFAULT_ARCHIVE_URL),
            log_file: env::var_os("NASA_TUI_LOG")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            log_file: None,
        }
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string());
    value.trim_end_matches('/').to_string()
}
