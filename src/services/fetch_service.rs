//! One fetch cycle: bridge rate, then every source in parallel into the cache

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::api::{BridgeRateSource, RateSource};
use crate::cache::RateStore;
use crate::services::rate_service;
use crate::utils::RatesError;

/// Outcome of a completed cycle
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CycleSummary {
    /// Sources whose rate was written to the cache
    pub stored: Vec<String>,
    /// Sources that failed at fetch, normalize or write
    pub failed: Vec<String>,
}

pub struct FetchCoordinator {
    store: Arc<dyn RateStore>,
    bridge: Arc<dyn BridgeRateSource>,
    sources: Vec<Arc<dyn RateSource>>,
    rate_ttl: Duration,
}

impl FetchCoordinator {
    pub fn new(
        store: Arc<dyn RateStore>,
        bridge: Arc<dyn BridgeRateSource>,
        sources: Vec<Arc<dyn RateSource>>,
        rate_ttl: Duration,
    ) -> Self {
        Self {
            store,
            bridge,
            sources,
            rate_ttl,
        }
    }

    /// Run one fetch cycle
    ///
    /// Fails only if the store is unreachable or the bridge rate can't be
    /// fetched; in both cases nothing is written. Past that point each source
    /// runs in its own task and its failure is logged and counted, never
    /// propagated.
    pub async fn run(&self) -> Result<CycleSummary, RatesError> {
        self.store
            .ping()
            .await
            .map_err(|e| RatesError::StoreUnreachable(e.to_string()))?;

        let bridge_rate_usd = self
            .bridge
            .fetch_rate()
            .await
            .map_err(RatesError::BridgeFetchFailed)?
            .last_price;
        info!("Bridge rate BTC/USD: {}", bridge_rate_usd);

        let mut units = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            let store = Arc::clone(&self.store);
            let ttl = self.rate_ttl;
            units.spawn(async move {
                let name = source.display_name().to_string();
                let result = store_source_rate(source.as_ref(), store.as_ref(), bridge_rate_usd, ttl).await;
                (name, result)
            });
        }

        let mut summary = CycleSummary::default();
        while let Some(joined) = units.join_next().await {
            match joined {
                Ok((name, Ok(()))) => summary.stored.push(name),
                Ok((name, Err(e))) => {
                    error!("{}", e);
                    summary.failed.push(name);
                }
                // A panicking unit loses its name with it
                Err(e) => {
                    error!("Fetch task aborted: {}", e);
                    summary.failed.push("<panicked>".to_string());
                }
            }
        }

        info!(
            "Fetch cycle done: {} stored, {} failed",
            summary.stored.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Run a cycle every `interval` until `shutdown` resolves
    ///
    /// Cycles never overlap and a failed cycle is logged, not fatal. A shutdown
    /// that arrives mid-cycle takes effect once that cycle finishes. Returns the
    /// number of cycles run.
    pub async fn run_every(&self, interval: Duration, shutdown: impl Future<Output = ()>) -> usize {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);
        let mut cycles = 0;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutting down after {} cycles", cycles);
                    return cycles;
                }
                _ = ticker.tick() => {
                    cycles += 1;
                    if let Err(e) = self.run().await {
                        error!("Fetch cycle failed: {}", e);
                    }
                }
            }
        }
    }
}

/// Fetch, normalize and cache a single source's rate
async fn store_source_rate(
    source: &dyn RateSource,
    store: &dyn RateStore,
    bridge_rate_usd: f64,
    ttl: Duration,
) -> Result<(), RatesError> {
    let name = source.display_name();

    let quote = source
        .fetch_rate()
        .await
        .map_err(|error| RatesError::SourceFetchFailed {
            source_name: name.to_string(),
            error,
        })?;
    debug!("Quote from {}: {:?}", name, quote);

    let rate = rate_service::normalize(bridge_rate_usd, name, &quote).map_err(|error| {
        RatesError::NormalizationFailed {
            source_name: name.to_string(),
            error,
        }
    })?;
    info!("Rate for {}: {:?}", name, rate);

    // Re-setting the key also resets its expiration
    store
        .put(name, &rate, ttl)
        .await
        .map_err(|error| RatesError::StoreWriteFailed {
            key: name.to_string(),
            error,
        })
}
