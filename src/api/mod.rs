//! Upstream rate sources
//!
//! Every exchange is reached through the same two-method capability so the fetch
//! cycle can treat them as a flat list. Adding a venue means adding one
//! `RateSource` implementation and listing it in [`all_sources`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client as HttpClient;

use crate::models::{BridgeQuote, Quote};

pub mod client;
pub mod coincap;
pub mod exchanges;
pub mod models;

pub use client::{build_http_client, Upstream};
pub use coincap::CoinCapApi;
pub use models::ApiError;

/// A single exchange's ticker for the tracked asset
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Exchange name, used as the cache key and output label
    fn display_name(&self) -> &str;

    async fn fetch_rate(&self) -> Result<Quote, ApiError>;
}

/// Source of the bridge asset's USD price
#[async_trait]
pub trait BridgeRateSource: Send + Sync {
    async fn fetch_rate(&self) -> Result<BridgeQuote, ApiError>;
}

/// Every exchange polled in a fetch cycle
pub fn all_sources(http: &HttpClient) -> Vec<Arc<dyn RateSource>> {
    use exchanges::*;

    vec![
        Arc::new(BinanceApi::new(http.clone())),
        Arc::new(KrakenApi::new(http.clone())),
        Arc::new(BitfinexApi::new(http.clone())),
        Arc::new(PoloniexApi::new(http.clone())),
        Arc::new(HuobiApi::new(http.clone())),
        Arc::new(HitBtcApi::new(http.clone())),
        Arc::new(ExmoApi::new(http.clone())),
        Arc::new(CexApi::new(http.clone())),
        Arc::new(BigOneApi::new(http.clone())),
        Arc::new(CoinbaseApi::new(http.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    #[test]
    fn test_source_names_are_unique() {
        let http = build_http_client(Duration::from_secs(1)).unwrap();
        let sources = all_sources(&http);
        let names: HashSet<&str> = sources.iter().map(|s| s.display_name()).collect();

        assert_eq!(names.len(), sources.len());
        assert!(names.contains("Kraken"));
        assert!(names.contains("Binance"));
    }
}
