use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::client::{build_quote, parse_number, Endpoint, Upstream};
use crate::api::{ApiError, RateSource};
use crate::models::{Quote, BRIDGE_ASSET};

/// GET /api/v3/ticker/24hr
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    last_price: String,
    volume: String,
}

/// Binance spot ticker for DASH/BTC
pub struct BinanceApi {
    endpoint: Endpoint,
}

impl BinanceApi {
    const SYMBOL: &'static str = "DASHBTC";
}

impl Upstream for BinanceApi {
    const DEFAULT_BASE_URL: &'static str = "https://api.binance.com";

    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

fn into_quote(ticker: Ticker24h, fetch_time: DateTime<Utc>) -> Result<Quote, ApiError> {
    build_quote(
        BRIDGE_ASSET,
        parse_number("lastPrice", &ticker.last_price)?,
        parse_number("volume", &ticker.volume)?,
        fetch_time,
    )
}

#[async_trait]
impl RateSource for BinanceApi {
    fn display_name(&self) -> &str {
        "Binance"
    }

    async fn fetch_rate(&self) -> Result<Quote, ApiError> {
        let path = format!("/api/v3/ticker/24hr?symbol={}", Self::SYMBOL);
        let ticker: Ticker24h = self.endpoint.get_json(&path).await?;
        into_quote(ticker, Utc::now())
    }
}
