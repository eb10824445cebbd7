use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, parse_number, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, BRIDGE_ASSET};

/// GET /markets/{symbol}/ticker24h
#[derive(Debug, Deserialize)]
struct Ticker24h {
    close: String,
    /// Base asset volume
    quantity: String,
}

/// Poloniex 24h ticker for DASH/BTC
pub struct PoloniexApi {
    endpoint: Endpoint,
}

impl PoloniexApi {
    const SYMBOL: &'static str = "DASH_BTC";
}

impl Upstream for PoloniexApi {
    const DEFAULT_BASE_URL: &'static str = "https://api.poloniex.com";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(ticker: Ticker24h, fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    build_quote(
        BRIDGE_ASSET,
        parse_number("close", &ticker.close)?,
        parse_number("quantity", &ticker.quantity)?,
        fetch_time,
    )
}

#[async_trait]
impl RateSource for PoloniexApi {
    fn display_name(&self) -> &str {
        "Poloniex"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/markets/{}/ticker24h", Self::SYMBOL);
        let ticker: Ticker24h = self.endpoint.get_json(&path).await?;
        into_quote(ticker, Utc::now())
    }
}
