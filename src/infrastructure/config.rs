use anyhow::{Context, Result, anyhow};
use chrono::Duration;
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::Level;

pub const CACHE_TTL_VAR: &str = "RECUR_CACHE_TTL_SECS";
pub const WEEKDAY_SCAN_VAR: &str = "RECUR_WEEKDAY_SCAN_DAYS";
pub const DEFAULT_TIMEZONE_VAR: &str = "RECUR_DEFAULT_TIMEZONE";
pub const DEFAULT_WINDOW_VAR: &str = "RECUR_DEFAULT_WINDOW_MINS";
pub const LOG_LEVEL_VAR: &str = "RECUR_LOG_LEVEL";

/// Engine settings, read from the environment (and `.env`) by [`EngineConfig::from_env`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a computed occurrence may be served from a schedule's cache
    pub cache_ttl: Duration,
    /// Days a weekday scan looks ahead before reporting no occurrence
    pub weekday_scan_days: u32,
    /// Zone used for drafts that do not name one
    pub default_timezone: Tz,
    /// Window length when a draft only gives a start time
    pub default_window_minutes: i64,
    pub log_level: Level,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::hours(1),
            weekday_scan_days: 14,
            default_timezone: Tz::UTC,
            default_window_minutes: 60,
            log_level: Level::INFO,
        }
    }
}

impl EngineConfig {
    /// Loads `.env` if present, then reads the `RECUR_*` variables over the defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(CACHE_TTL_VAR) {
            let secs: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{CACHE_TTL_VAR} must be a number of seconds, got {raw:?}"))?;
            if secs < 0 {
                return Err(anyhow!("{CACHE_TTL_VAR} must not be negative, got {secs}"));
            }
            config.cache_ttl = Duration::seconds(secs);
        }

        if let Some(raw) = lookup(WEEKDAY_SCAN_VAR) {
            let days: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("{WEEKDAY_SCAN_VAR} must be a number of days, got {raw:?}"))?;
            if days < 7 {
                return Err(anyhow!("{WEEKDAY_SCAN_VAR} must cover a full week, got {days}"));
            }
            config.weekday_scan_days = days;
        }

        if let Some(raw) = lookup(DEFAULT_TIMEZONE_VAR) {
            config.default_timezone = Tz::from_str(raw.trim())
                .map_err(|e| anyhow!("{DEFAULT_TIMEZONE_VAR} is not an IANA zone: {e}"))?;
        }

        if let Some(raw) = lookup(DEFAULT_WINDOW_VAR) {
            let minutes: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{DEFAULT_WINDOW_VAR} must be a number of minutes, got {raw:?}"))?;
            if !(1..24 * 60).contains(&minutes) {
                return Err(anyhow!("{DEFAULT_WINDOW_VAR} must be between 1 and 1439, got {minutes}"));
            }
            config.default_window_minutes = minutes;
        }

        if let Some(raw) = lookup(LOG_LEVEL_VAR) {
            config.log_level = Level::from_str(raw.trim())
                .map_err(|e| anyhow!("{LOG_LEVEL_VAR} is not a log level: {e}"))?;
        }

        Ok(config)
    }
}
