use log::warn;
use nba_api::client::{DEFAULT_TIMEOUT, LIVE_DATA_BASE, STATS_BASE};
use nba_api::scoreboard::{DEFAULT_DETAIL_CONCURRENCY, DEFAULT_DETAIL_TIMEOUT};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Start-up configuration, read from `NBA_SCOR_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub bind: String,
    /// Fixed season such as "2025-26". `None` follows the calendar.
    pub season: Option<String>,
    pub http_timeout: Duration,
    pub detail_timeout: Duration,
    pub detail_concurrency: usize,
    pub live_base: String,
    pub stats_base: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_owned(),
            season: None,
            http_timeout: DEFAULT_TIMEOUT,
            detail_timeout: DEFAULT_DETAIL_TIMEOUT,
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
            live_base: LIVE_DATA_BASE.to_owned(),
            stats_base: STATS_BASE.to_owned(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source. Unset or blank keys keep
    /// their default; values that don't parse are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            bind: var("NBA_SCOR_BIND").unwrap_or(defaults.bind),
            season: var("NBA_SCOR_SEASON"),
            http_timeout: parsed(var("NBA_SCOR_HTTP_TIMEOUT_SECS"), "NBA_SCOR_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            detail_timeout: parsed(var("NBA_SCOR_DETAIL_TIMEOUT_MS"), "NBA_SCOR_DETAIL_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.detail_timeout),
            detail_concurrency: parsed(var("NBA_SCOR_DETAIL_CONCURRENCY"), "NBA_SCOR_DETAIL_CONCURRENCY")
                .unwrap_or(defaults.detail_concurrency),
            live_base: var("NBA_SCOR_LIVE_BASE").unwrap_or(defaults.live_base),
            stats_base: var("NBA_SCOR_STATS_BASE").unwrap_or(defaults.stats_base),
        }
    }
}

fn parsed<T: FromStr>(raw: Option<String>, key: &str) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}
