use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::client::{build_quote, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, BRIDGE_ASSET};

// Positions in the v2 ticker array
const LAST_PRICE: usize = 6;
const VOLUME: usize = 7;

/// Bitfinex v2 ticker for DSH/BTC
pub struct BitfinexApi {
    endpoint: Endpoint,
}

impl BitfinexApi {
    const SYMBOL: &'static str = "tDSHBTC";
}

impl Upstream for BitfinexApi {
    const DEFAULT_BASE_URL: &'static str = "https://api-pub.bitfinex.com";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(ticker: &[f64], fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    match (ticker.get(LAST_PRICE), ticker.get(VOLUME)) {
        (Some(&last), Some(&volume)) => build_quote(BRIDGE_ASSET, last, volume, fetch_time),
        _ => Err(ApiError::InvalidData(format!(
            "ticker has {} fields, expected at least {}",
            ticker.len(),
            VOLUME + 1
        ))),
    }
}

#[async_trait]
impl RateSource for BitfinexApi {
    fn display_name(&self) -> &str {
        "Bitfinex"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/v2/ticker/{}", Self::SYMBOL);
        let ticker: Vec<f64> = self.endpoint.get_json(&path).await?;
        into_quote(&ticker, Utc::now())
    }
}
