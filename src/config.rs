//! Process configuration, read from the environment once at start-up

use std::time::Duration;

use crate::utils::RatesError;

const REDIS_URL: &str = "REDIS_URL";
const RATES_KEY_PREFIX: &str = "RATES_KEY_PREFIX";
const RATE_TTL_SECS: &str = "RATE_TTL_SECS";
const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
const FETCH_INTERVAL_SECS: &str = "FETCH_INTERVAL_SECS";

const DEFAULT_RATE_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Full `redis://` connection URL
    pub redis_url: String,
    pub key_prefix: String,
    /// Expiration of each cached rate
    pub rate_ttl: Duration,
    pub http_timeout: Duration,
    /// Period of the daemon loop
    pub fetch_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, RatesError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RatesError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let redis_url = get(REDIS_URL).ok_or_else(|| RatesError::ConfigMissing(REDIS_URL.to_string()))?;

        Ok(Self {
            redis_url: normalize_redis_url(redis_url.trim()),
            key_prefix: get(RATES_KEY_PREFIX).unwrap_or_default(),
            rate_ttl: seconds(RATE_TTL_SECS, get(RATE_TTL_SECS), DEFAULT_RATE_TTL_SECS)?,
            http_timeout: seconds(HTTP_TIMEOUT_SECS, get(HTTP_TIMEOUT_SECS), DEFAULT_HTTP_TIMEOUT_SECS)?,
            fetch_interval: seconds(
                FETCH_INTERVAL_SECS,
                get(FETCH_INTERVAL_SECS),
                DEFAULT_FETCH_INTERVAL_SECS,
            )?,
        })
    }
}

/// Accept a bare `host:port` address as well as a full URL
fn normalize_redis_url(raw: &str) -> String {
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("redis://{}", raw)
    }
}

fn seconds(key: &str, raw: Option<String>, default: u64) -> Result<Duration, RatesError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(RatesError::ConfigInvalid {
            key: key.to_string(),
            value: raw,
        }),
    }
}
