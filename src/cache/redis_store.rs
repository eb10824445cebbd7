use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use super::{RateStore, StoreError};
use crate::models::DashUsdRate;

/// Redis-backed rate cache
///
/// `ConnectionManager` is a cheap handle over one multiplexed connection, so each
/// call clones it instead of locking.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    key_prefix: String,
}

impl RedisStore {
    /// Open a managed connection to `url`
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;
        Ok(Self {
            connection,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

/// `KEYS` pattern matching every key under `prefix` and nothing else
fn key_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

/// Cache key for a stored Redis key, `None` if it lies outside `prefix`
fn strip_key_prefix(prefix: &str, key: &str) -> Option<String> {
    key.strip_prefix(prefix).map(str::to_string)
}

#[async_trait]
impl RateStore for RedisStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong != "PONG" {
            return Err(StoreError::Backend(format!("unexpected PING reply '{}'", pong)));
        }
        debug!("Redis is alive");
        Ok(())
    }

    async fn put(&self, key: &str, rate: &DashUsdRate, ttl: Duration) -> Result<(), StoreError> {
        let value = rate.encode()?;
        let mut conn = self.connection.clone();
        let (): () = conn.set_ex(self.full_key(key), value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(self.full_key(key)).await?;
        Ok(value)
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection.clone();
        let keys: Vec<String> = conn.keys(key_pattern(&self.key_prefix)).await?;
        Ok(keys
            .iter()
            .filter_map(|k| strip_key_prefix(&self.key_prefix, k))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_pattern() {
        assert_eq!(key_pattern(""), "*");
        assert_eq!(key_pattern("dashrates:"), "dashrates:*");
    }

    #[test]
    fn test_key_pattern_escapes_glob_characters() {
        assert_eq!(key_pattern("rates*"), r"rates\**");
        assert_eq!(key_pattern("r?[a-b]:"), r"r\?\[a-b\]:*");
        assert_eq!(key_pattern(r"back\slash"), r"back\\slash*");
    }

    #[test]
    fn test_strip_key_prefix() {
        assert_eq!(strip_key_prefix("dashrates:", "dashrates:Kraken"), Some("Kraken".to_string()));
        assert_eq!(
            strip_key_prefix("dashrates:", "dashrates:Coinbase Pro"),
            Some("Coinbase Pro".to_string())
        );
        assert_eq!(strip_key_prefix("", "Kraken"), Some("Kraken".to_string()));
    }

    #[test]
    fn test_key_outside_prefix_is_skipped() {
        assert_eq!(strip_key_prefix("dashrates:", "session:42"), None);
        assert_eq!(strip_key_prefix("rates*", "ratesX"), None);
    }
}
