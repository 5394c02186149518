// crates/core/src/config.rs
//! Client configuration, read from the environment with fixed defaults.

use std::time::Duration;

use plate_watch_types::{DEFAULT_MAX_RETRIES, MAX_RETRIES_LIMIT};

use crate::tracker::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_URL: &str = "PLATE_WATCH_API_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "PLATE_WATCH_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PLATE_WATCH_REQUEST_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "PLATE_WATCH_MAX_RETRIES";

/// Settings for talking to the lookup backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub max_retries: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ClientConfig {
    /// Read `PLATE_WATCH_*` variables; unset or unparseable values keep
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup(ENV_API_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let poll_interval = lookup(ENV_POLL_INTERVAL_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        let request_timeout = lookup(ENV_REQUEST_TIMEOUT_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_retries = lookup(ENV_MAX_RETRIES)
            .and_then(|v| v.trim().parse::<u8>().ok())
            .filter(|n| (1..=MAX_RETRIES_LIMIT).contains(n))
            .unwrap_or(defaults.max_retries);

        Self {
            api_url,
            poll_interval,
            request_timeout,
            max_retries,
        }
    }
}
