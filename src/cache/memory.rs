//! In-process `RateStore` for tests

use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RateStore, StoreError};
use crate::models::DashUsdRate;

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, (String, Instant)>>,
    failing_keys: HashSet<String>,
    unreachable: bool,
    failing_listing: bool,
    failing_gets: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose liveness probe fails
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// A store that rejects writes to the given keys
    pub fn failing_writes_for(keys: &[&str]) -> Self {
        Self {
            failing_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }

    /// A store that answers pings but fails to enumerate keys
    pub fn failing_reads() -> Self {
        Self {
            failing_listing: true,
            ..Self::default()
        }
    }

    /// A store that enumerates keys but fails every `get`
    pub fn failing_gets() -> Self {
        Self {
            failing_gets: true,
            ..Self::default()
        }
    }

    /// Insert a raw value, bypassing encoding
    pub async fn insert_raw(&self, key: &str, raw: &str, ttl: Duration) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (raw.to_string(), Instant::now() + ttl));
    }

    /// Decoded value for `key`, panicking on bad content
    pub async fn rate(&self, key: &str) -> Option<DashUsdRate> {
        let raw = self.get(key).await.unwrap()?;
        Some(DashUsdRate::decode(&raw).unwrap())
    }

    pub async fn live_count(&self) -> usize {
        self.keys().await.unwrap().len()
    }
}

#[async_trait]
impl RateStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        Ok(())
    }

    async fn put(&self, key: &str, rate: &DashUsdRate, ttl: Duration) -> Result<(), StoreError> {
        if self.failing_keys.contains(key) {
            return Err(StoreError::Backend(format!("write to {} rejected", key)));
        }
        let value = rate.encode()?;
        self.insert_raw(key, &value, ttl).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.failing_gets {
            return Err(StoreError::Backend(format!("read of {} timed out", key)));
        }
        let entries = self.entries.lock().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(raw, _)| raw.clone()))
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        if self.failing_listing {
            return Err(StoreError::Backend("connection reset".to_string()));
        }
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|(_, (_, expires_at))| *expires_at > now)
            .map(|(key, _)| key.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rate(name: &str) -> DashUsdRate {
        DashUsdRate {
            name: name.to_string(),
            rate_usd: 30.0,
            volume_usd: None,
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_overwrites_and_lists() {
        let store = MemoryStore::new();
        store.put("Kraken", &rate("Kraken"), Duration::from_secs(60)).await.unwrap();

        let mut newer = rate("Kraken");
        newer.rate_usd = 31.0;
        store.put("Kraken", &newer, Duration::from_secs(60)).await.unwrap();

        let entries = store.list_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(store.rate("Kraken").await.unwrap().rate_usd, 31.0);
    }

    #[tokio::test]
    async fn test_expired_entries_are_hidden() {
        let store = MemoryStore::new();
        store.insert_raw("Exmo", "{}", Duration::from_millis(0)).await;
        store.put("Kraken", &rate("Kraken"), Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec!["Kraken".to_string()]);
        assert_eq!(store.get("Exmo").await.unwrap(), None);
    }
}
