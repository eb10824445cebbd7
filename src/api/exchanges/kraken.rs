use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, parse_number, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, BRIDGE_ASSET};

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    error: Vec<String>,
    #[serde(default)]
    result: HashMap<String, PairTicker>,
}

#[derive(Debug, Deserialize)]
struct PairTicker {
    /// Last trade closed: [price, lot volume]
    c: Vec<String>,
    /// Volume: [today, last 24 hours]
    v: Vec<String>,
}

/// Kraken public ticker for DASH/XBT
pub struct KrakenApi {
    endpoint: Endpoint,
}

impl KrakenApi {
    const PAIR: &'static str = "DASHXBT";
}

impl Upstream for KrakenApi {
    const DEFAULT_BASE_URL: &'static str = "https://api.kraken.com";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(response: TickerResponse, fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    if !response.error.is_empty() {
        return Err(ApiError::InvalidData(response.error.join("; ")));
    }

    // Kraken may answer under its own pair alias, so take whichever entry came back.
    let ticker = response
        .result
        .into_values()
        .next()
        .ok_or_else(|| ApiError::InvalidData("empty ticker result".to_string()))?;

    let last = ticker
        .c
        .first()
        .ok_or_else(|| ApiError::InvalidData("missing last trade".to_string()))?;
    let volume = ticker
        .v
        .get(1)
        .ok_or_else(|| ApiError::InvalidData("missing 24h volume".to_string()))?;

    // Kraken calls BTC "XBT"
    build_quote(
        BRIDGE_ASSET,
        parse_number("c", last)?,
        parse_number("v", volume)?,
        fetch_time,
    )
}

#[async_trait]
impl RateSource for KrakenApi {
    fn display_name(&self) -> &str {
        "Kraken"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/0/public/Ticker?pair={}", Self::PAIR);
        let response: TickerResponse = self.endpoint.get_json(&path).await?;
        into_quote(response, Utc::now())
    }
}
