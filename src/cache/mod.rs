//! Keyed rate cache
//!
//! Exchange name maps to the JSON-encoded `DashUsdRate`, each entry with its own
//! expiration. The store does not validate values; bad content shows up as a
//! decode error for whoever reads it.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::DashUsdRate;

#[cfg(test)]
pub mod memory;
pub mod redis_store;

#[cfg(test)]
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Cache backend errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Access pattern against the shared cache
///
/// Implementations must accept concurrent `put`s to different keys.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Liveness probe
    async fn ping(&self) -> Result<(), StoreError>;

    /// Store a rate under `key`, replacing any previous value and resetting its expiration
    async fn put(&self, key: &str, rate: &DashUsdRate, ttl: Duration) -> Result<(), StoreError>;

    /// Raw value for `key`, `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// All live keys, in store order
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Every live entry as `(key, raw value)`
    ///
    /// A key that expires between listing and fetching is left out.
    async fn list_all(&self) -> Result<Vec<(String, String)>, StoreError> {
        let mut entries = Vec::new();
        for key in self.keys().await? {
            if let Some(raw) = self.get(&key).await? {
                entries.push((key, raw));
            }
        }
        Ok(entries)
    }
}
