//! Application configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use tracing::warn;
use url::Url;

use crate::error::ConfigError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Account ===
    /// Twitch account the miner logs in as.
    #[serde(default)]
    pub current_user: String,

    // === Notifications ===
    /// Discord webhook receiving miner events.
    #[serde(default, deserialize_with = "webhook_url")]
    pub discord_webhook: Option<Url>,

    // === Mining Behaviour ===
    /// Place channel-points predictions.
    #[serde(default = "default_true", deserialize_with = "flag_default_true")]
    pub do_predictions: bool,

    /// Mine the followed channels instead of the channel file.
    #[serde(default = "default_true", deserialize_with = "flag_default_true")]
    pub use_followers_list: bool,

    /// Sort order of the streamer list handed to the miner.
    #[serde(default, deserialize_with = "flag_default_false")]
    pub use_descending_order: bool,

    // === Streamer Sources ===
    /// File with one channel per line.
    #[serde(default = "default_channels_file")]
    pub channels_file: PathBuf,

    /// JSON file mapping channel -> accounts banned from watching it.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub ban_list_path: Option<PathBuf>,

    // === Analytics ===
    /// Analytics server port.
    #[serde(default = "default_port", deserialize_with = "port_or_default")]
    pub port: u16,

    /// Analytics server bind host.
    #[serde(default = "default_analytics_host")]
    pub analytics_host: String,

    /// Analytics page refresh interval in minutes.
    #[serde(default = "default_refresh_minutes", deserialize_with = "refresh_or_default")]
    pub analytics_refresh_minutes: u64,

    /// Days of history shown by the analytics page.
    #[serde(default = "default_days_ago", deserialize_with = "days_ago_or_default")]
    pub analytics_days_ago: u64,

    // === Engine ===
    /// Command that runs the mining engine. Unset means dry run.
    #[serde(default)]
    pub miner_command: Option<String>,
}

/// Default analytics port.
pub const DEFAULT_PORT: u16 = 4550;

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_channels_file() -> PathBuf {
    PathBuf::from("channels.txt")
}

fn default_analytics_host() -> String {
    "127.0.0.1".to_string()
}

fn default_refresh_minutes() -> u64 {
    5
}

fn default_days_ago() -> u64 {
    7
}

/// Parse a boolean flag. `None` means the value is not recognized.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn flag_or<'de, D>(deserializer: D, default: bool) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_flag(&raw).unwrap_or_else(|| {
        warn!(value = %raw, default, "Unrecognized flag value, using default");
        default
    }))
}

fn flag_default_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    flag_or(deserializer, true)
}

fn flag_default_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    flag_or(deserializer, false)
}

fn parse_or<'de, D, T>(deserializer: D, key: &str, default: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or_else(|_| {
        warn!(value = %raw, default = %default, "Invalid {}, using default", key);
        default
    }))
}

fn port_or_default<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    parse_or(deserializer, "PORT", DEFAULT_PORT)
}

fn refresh_or_default<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    parse_or(deserializer, "ANALYTICS_REFRESH_MINUTES", default_refresh_minutes())
}

fn days_ago_or_default<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    parse_or(deserializer, "ANALYTICS_DAYS_AGO", default_days_ago())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from))
}

fn webhook_url<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    match Url::parse(raw.trim()) {
        Ok(url) => Ok(Some(url)),
        Err(e) => {
            warn!(error = %e, "Invalid DISCORD_WEBHOOK, Discord notifications disabled");
            Ok(None)
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Build configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.current_user.trim().is_empty() {
            return Err(ConfigError::MissingCurrentUser);
        }

        Ok(())
    }

    /// Account name as the miner sees it.
    pub fn username(&self) -> &str {
        self.current_user.trim()
    }

    /// Whether a real engine command is configured.
    pub fn is_dry_run(&self) -> bool {
        self.miner_command
            .as_deref()
            .map_or(true, |cmd| cmd.trim().is_empty())
    }
}
